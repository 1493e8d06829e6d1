mod common;

use benchling_cli::alignment::{Algorithm, AlignmentQuery, ClustaloOptions, MafftOptions};
use benchling_cli::catalog::{Catalog, MatchMode};
use benchling_cli::models::{FolderPatch, FolderType, NewFolder, NewSequence, SequencePatch};
use benchling_cli::resources::SearchQuery;
use benchling_cli::{BenchlingError, Method};
use common::{client, url, MockTransport};
use serde_json::json;

fn puc19() -> serde_json::Value {
    json!({
        "id": "seq_abc",
        "name": "pUC19",
        "bases": "ATGCATGCAT",
        "circular": true,
        "folder": "fol_a",
        "annotations": [
            {"name": "ori", "start": 4, "end": 0, "strand": 1, "type": "rep_origin"}
        ]
    })
}

fn folders() -> serde_json::Value {
    json!({"folders": [
        {"id": "fol_a", "name": "Plasmids", "sequences": [
            {"id": "seq_abc", "name": "pUC19"},
            {"id": "seq_def", "name": "pET-28a"},
            {"id": "seq_ghi", "name": "pUC57-kan"}
        ]},
        {"id": "fol_b", "name": "Oligos", "sequences": [
            {"id": "seq_jkl", "name": "M13-fwd"}
        ]}
    ]})
}

#[test]
fn get_sequence_matches_requested_id() {
    let api = client(MockTransport::new().on(Method::Get, "sequences/seq_abc", 200, puc19()));
    let seq = api.sequences().get("seq_abc").unwrap();
    assert_eq!(seq.id, "seq_abc");
    assert_eq!(seq.name, "pUC19");
    assert_eq!(seq.annotations[0].end, 10);

    let requests = api.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, url("sequences/seq_abc"));
    assert!(requests[0].authenticated);
}

#[test]
fn missing_sequence_relays_not_found() {
    let api = client(MockTransport::new().on(
        Method::Get,
        "sequences/seq_missing",
        404,
        json!({"error": {"message": "Sequence seq_missing not found"}}),
    ));
    let err = api.sequences().get("seq_missing").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Sequence seq_missing not found"));
}

#[test]
fn empty_id_sends_nothing() {
    let api = client(MockTransport::new());
    let err = api.sequences().get("").unwrap_err();
    assert!(matches!(err, BenchlingError::InvalidInput(_)));
    assert!(api.transport().requests().is_empty());
}

#[test]
fn unexpected_shape_is_parse_error() {
    let api = client(MockTransport::new().on(
        Method::Get,
        "sequences/seq_abc",
        200,
        json!({"name": "no id here"}),
    ));
    let err = api.sequences().get("seq_abc").unwrap_err();
    assert!(matches!(err, BenchlingError::Json(_)));
}

#[test]
fn catalog_regex_search_keeps_order() {
    let api = client(MockTransport::new().on(Method::Get, "folders", 200, folders()));
    let catalog = Catalog::load(&api).unwrap();
    let hits = catalog
        .filter_sequences(&[("name", "^pUC")], MatchMode::Regex)
        .unwrap();
    let ids: Vec<_> = hits.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["seq_abc", "seq_ghi"]);
    assert!(hits.iter().all(|s| s.folder.as_deref() == Some("fol_a")));
}

#[test]
fn catalog_find_fetches_full_record() {
    let api = client(
        MockTransport::new()
            .on(Method::Get, "folders", 200, folders())
            .on(Method::Get, "sequences/seq_abc", 200, puc19()),
    );
    let catalog = Catalog::load(&api).unwrap();
    let seq = catalog
        .find_sequence(&api, "name", "pUC", MatchMode::Regex)
        .unwrap();
    assert_eq!(seq.id, "seq_abc");
    assert_eq!(seq.bases, "ATGCATGCAT");

    let err = catalog
        .find_folder(&api, "name", "Archive", MatchMode::Exact)
        .unwrap_err();
    assert!(matches!(err, BenchlingError::NoMatch { .. }));
}

#[test]
fn folder_listing_error_means_bad_key() {
    let api = client(MockTransport::new().on(
        Method::Get,
        "folders",
        200,
        json!({"error": "Authentication required"}),
    ));
    let err = api.folders().list().unwrap_err();
    assert!(matches!(err, BenchlingError::Login(_)));
}

fn new_plasmid() -> NewSequence {
    NewSequence {
        name: "pNew".into(),
        bases: "ATGC".into(),
        circular: true,
        folder: "fol_a".into(),
        ..Default::default()
    }
}

#[test]
fn create_sequence_with_overwrite() {
    let mock = MockTransport::new()
        .on(
            Method::Get,
            "folders/fol_a",
            200,
            json!({"id": "fol_a", "name": "Plasmids", "sequences": [
                {"id": "seq_old", "name": "pNew"},
                {"id": "seq_other", "name": "pOther"}
            ]}),
        )
        .on(
            Method::Get,
            "folders/fol_a",
            200,
            json!({"id": "fol_a", "name": "Plasmids", "sequences": [
                {"id": "seq_other", "name": "pOther"},
                {"id": "seq_new", "name": "pNew"}
            ]}),
        )
        .on(Method::Delete, "sequences/seq_old", 200, json!({}))
        .on(Method::Post, "sequences", 201, json!({}))
        .on(
            Method::Get,
            "sequences/seq_new",
            200,
            json!({"id": "seq_new", "name": "pNew", "bases": "ATGC", "circular": true}),
        );
    let api = client(mock);

    let seq = api.sequences().create(&new_plasmid(), true).unwrap();
    assert_eq!(seq.id, "seq_new");

    let calls: Vec<_> = api
        .transport()
        .requests()
        .into_iter()
        .map(|r| (r.method, r.url))
        .collect();
    assert_eq!(
        calls,
        [
            (Method::Get, url("folders/fol_a")),
            (Method::Delete, url("sequences/seq_old")),
            (Method::Post, url("sequences")),
            (Method::Get, url("folders/fol_a")),
            (Method::Get, url("sequences/seq_new")),
        ]
    );
    let post = &api.transport().requests()[2];
    assert_eq!(
        post.body,
        Some(json!({"name": "pNew", "bases": "ATGC", "circular": true, "folder": "fol_a"}))
    );
}

#[test]
fn create_sequence_reports_lost_record() {
    let folder = json!({"id": "fol_a", "name": "Plasmids", "sequences": [
        {"id": "seq_old", "name": "pNew"}
    ]});
    let api = client(
        MockTransport::new()
            .on(Method::Get, "folders/fol_a", 200, folder)
            .on(Method::Post, "sequences", 200, json!({})),
    );
    let err = api.sequences().create(&new_plasmid(), false).unwrap_err();
    assert!(matches!(err, BenchlingError::Creation(name) if name == "pNew"));
}

#[test]
fn create_folder_defaults_owner_to_me() {
    let api = client(
        MockTransport::new()
            .on(Method::Get, "entities/me", 200, json!({"id": "ent_me", "handle": "jdoe"}))
            .on(
                Method::Post,
                "folders",
                201,
                json!({"id": "fol_new", "name": "Cloning", "sequences": []}),
            ),
    );
    let folder = api
        .folders()
        .create(&NewFolder {
            name: "Cloning".into(),
            folder_type: FolderType::Notebook,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(folder.id, "fol_new");
    let post = &api.transport().requests()[1];
    assert_eq!(
        post.body,
        Some(json!({"name": "Cloning", "owner": "ent_me", "type": "NOTEBOOK"}))
    );
}

#[test]
fn patch_sends_only_changed_fields() {
    let api = client(MockTransport::new().on(
        Method::Patch,
        "sequences/seq_abc",
        200,
        json!({"id": "seq_abc", "name": "pUC19-v2"}),
    ));
    let patch = SequencePatch {
        name: Some("pUC19-v2".into()),
        ..Default::default()
    };
    let seq = api.sequences().patch("seq_abc", &patch).unwrap();
    assert_eq!(seq.name, "pUC19-v2");
    assert_eq!(
        api.transport().requests()[0].body,
        Some(json!({"name": "pUC19-v2"}))
    );
}

#[test]
fn text_search_walks_offsets() {
    let api = client(
        MockTransport::new()
            .on(Method::Post, "search", 200, json!({"results": [{"id": "seq_1"}, {"id": "seq_2"}]}))
            .on(Method::Post, "search", 200, json!({"results": [{"id": "seq_3"}]})),
    );
    let query = SearchQuery {
        limit: 2,
        ..SearchQuery::text("pUC")
    };
    let pages: Vec<_> = api
        .search_pages(query)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1][0]["id"], "seq_3");

    let offsets: Vec<_> = api
        .transport()
        .requests()
        .iter()
        .map(|r| r.body.as_ref().unwrap()["offset"].clone())
        .collect();
    assert_eq!(offsets, [json!(0), json!(2)]);
}

#[test]
fn zero_limit_is_rejected() {
    let api = client(MockTransport::new());
    let query = SearchQuery {
        limit: 0,
        ..SearchQuery::text("pUC")
    };
    assert!(api.search_pages(query).is_err());
}

#[test]
fn folder_patch_sends_changed_fields() {
    let api = client(MockTransport::new().on(
        Method::Patch,
        "folders/fol_a",
        200,
        json!({"id": "fol_a", "name": "Plasmids 2018", "sequences": []}),
    ));
    let patch = FolderPatch {
        name: Some("Plasmids 2018".into()),
        folder_type: Some(FolderType::Notebook),
        ..Default::default()
    };
    let folder = api.folders().patch("fol_a", &patch).unwrap();
    assert_eq!(folder.name, "Plasmids 2018");

    let requests = api.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Patch);
    assert_eq!(requests[0].url, url("folders/fol_a"));
    assert_eq!(
        requests[0].body,
        Some(json!({"name": "Plasmids 2018", "type": "NOTEBOOK"}))
    );
}

#[test]
fn deletes_target_the_record() {
    let api = client(
        MockTransport::new()
            .on(Method::Delete, "folders/fol_b", 200, json!({}))
            .on(Method::Delete, "sequences/seq_jkl", 200, json!({})),
    );
    api.sequences().delete("seq_jkl").unwrap();
    api.folders().delete("fol_b").unwrap();

    let requests = api.transport().requests();
    let calls: Vec<_> = requests.iter().map(|r| (r.method, r.url.clone())).collect();
    assert_eq!(
        calls,
        [
            (Method::Delete, url("sequences/seq_jkl")),
            (Method::Delete, url("folders/fol_b")),
        ]
    );
    assert!(requests.iter().all(|r| r.body.is_none() && r.authenticated));
}

#[test]
fn delete_failure_is_reported() {
    let api = client(MockTransport::new().on(
        Method::Delete,
        "folders/fol_b",
        403,
        json!({"error": {"message": "Forbidden"}}),
    ));
    let err = api.folders().delete("fol_b").unwrap_err();
    assert!(matches!(err, BenchlingError::Status { status: 403, .. }));
    assert!(api.folders().delete(" ").is_err());
    assert_eq!(api.transport().requests().len(), 1);
}

#[test]
fn mafft_alignment_request() {
    let api = client(MockTransport::new().on(
        Method::Post,
        "alignments",
        202,
        json!({"taskId": "task_1"}),
    ));
    let queries = [
        AlignmentQuery::SequenceId("seq_q".into()),
        AlignmentQuery::Encoded {
            name: Some("read.ab1".into()),
            data: "QUJD".into(),
        },
    ];
    let task = api
        .submit_alignment("seq_t", &queries, &Algorithm::Mafft(MafftOptions::default()))
        .unwrap();
    assert_eq!(task["taskId"], "task_1");

    let requests = api.transport().requests();
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].url, url("alignments"));
    assert_eq!(
        requests[0].body,
        Some(json!({
            "algorithm": "mafft",
            "algorithmOptions": {
                "adjust_direction": "no",
                "max_iterations": 0,
                "retree": 2,
                "gap_open_penalty": 1.53,
                "gap_extension_penalty": 0.0
            },
            "files": [
                {"id": "seq_t"},
                {"id": "seq_q"},
                {"name": "read.ab1", "data": "QUJD"}
            ]
        }))
    );
}

#[test]
fn clustalo_alignment_names_its_algorithm() {
    let api = client(MockTransport::new().on(Method::Post, "alignments", 200, json!({})));
    api.submit_alignment(
        "seq_t",
        &[AlignmentQuery::SequenceId("seq_q".into())],
        &Algorithm::Clustalo(ClustaloOptions::default()),
    )
    .unwrap();
    let body = api.transport().requests()[0].body.clone().unwrap();
    assert_eq!(body["algorithm"], "clustalo");
    assert_eq!(body["algorithmOptions"]["max_hmm_iterations"], 25);
    assert_eq!(body["algorithmOptions"]["mbed_guide_tree"], "yes");

    let err = api
        .submit_alignment("", &[], &Algorithm::Clustalo(ClustaloOptions::default()))
        .unwrap_err();
    assert!(matches!(err, BenchlingError::InvalidInput(_)));
    assert_eq!(api.transport().requests().len(), 1);
}

#[test]
fn alignment_and_task_lookups() {
    let api = client(
        MockTransport::new()
            .on(
                Method::Get,
                "alignments/seqanl_1",
                200,
                json!({"id": "seqanl_1", "name": "pUC19 reads", "alignedSequences": []}),
            )
            .on(
                Method::Get,
                "tasks/task_1",
                200,
                json!({"id": "task_1", "status": "SUCCEEDED", "response": {"id": "seqanl_1"}}),
            ),
    );
    let alignment = api.get_alignment("seqanl_1").unwrap();
    assert_eq!(alignment.name.as_deref(), Some("pUC19 reads"));
    assert!(alignment.extra.contains_key("alignedSequences"));

    let task = api.get_task("task_1").unwrap();
    assert_eq!(task.status.as_deref(), Some("SUCCEEDED"));
    assert_eq!(task.extra["response"]["id"], "seqanl_1");

    let urls: Vec<_> = api.transport().requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, [url("alignments/seqanl_1"), url("tasks/task_1")]);
}

#[test]
fn catalog_refresh_reloads_folders() {
    let api = client(
        MockTransport::new()
            .on(Method::Get, "folders", 200, folders())
            .on(
                Method::Get,
                "folders",
                200,
                json!({"folders": [
                    {"id": "fol_a", "name": "Plasmids", "sequences": [
                        {"id": "seq_abc", "name": "pUC19"},
                        {"id": "seq_new", "name": "pNew"}
                    ]}
                ]}),
            ),
    );
    let mut catalog = Catalog::load(&api).unwrap();
    assert_eq!(catalog.sequences().len(), 4);
    assert!(!catalog.sequence_exists("name", "pNew", MatchMode::Exact).unwrap());

    catalog.refresh(&api).unwrap();
    assert_eq!(catalog.folders().len(), 1);
    assert_eq!(catalog.sequences().len(), 2);
    assert!(catalog.sequence_exists("name", "pNew", MatchMode::Exact).unwrap());
    assert!(!catalog.folder_exists("name", "Oligos", MatchMode::Exact).unwrap());

    let requests = api.transport().requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.method == Method::Get && r.url == url("folders")));
}
