// GenBank flat-file output.
//
// Writes one record per sequence: LOCUS, DEFINITION, ACCESSION, VERSION,
// KEYWORDS and SOURCE headers, a FEATURES table built from annotations and
// primers, then the ORIGIN block and the `//` terminator.

use crate::models::{Annotation, Primer, Sequence};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const UNKNOWN_DATE: &str = "01-JAN-1970";
const FEATURE_INDENT: usize = 21;
const QUALIFIER_WIDTH: usize = 79 - FEATURE_INDENT;
const HEADER_INDENT: usize = 12;

pub fn to_genbank(seq: &Sequence) -> String {
    let mut out = String::new();
    let topology = if seq.circular { "circular" } else { "linear" };
    out.push_str(&format!(
        "LOCUS       {:<16} {:>11} bp    DNA     {:<8} UNA {}\n",
        locus_name(seq),
        seq.bases.len(),
        topology,
        locus_date(seq)
    ));

    let definition = seq
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(".");
    push_header(&mut out, "DEFINITION", definition);
    push_header(&mut out, "ACCESSION", &seq.id);
    push_header(&mut out, "VERSION", &seq.id);
    let keywords = if seq.aliases.is_empty() {
        ".".to_string()
    } else {
        format!("{}.", seq.aliases.join("; "))
    };
    push_header(&mut out, "KEYWORDS", &keywords);
    push_header(&mut out, "SOURCE", ".");
    out.push_str("  ORGANISM  .\n");

    out.push_str("FEATURES             Location/Qualifiers\n");
    if !seq.bases.is_empty() {
        push_feature(
            &mut out,
            "source",
            &format!("1..{}", seq.bases.len()),
            &[("mol_type", "other DNA")],
        );
    }
    for a in &seq.annotations {
        push_annotation(&mut out, a, seq);
    }
    for p in &seq.primers {
        push_primer(&mut out, p, seq);
    }

    out.push_str("ORIGIN\n");
    let lower = seq.bases.to_ascii_lowercase();
    for (i, line) in lower.as_bytes().chunks(60).enumerate() {
        out.push_str(&format!("{:>9}", i * 60 + 1));
        for block in line.chunks(10) {
            out.push(' ');
            out.push_str(&String::from_utf8_lossy(block));
        }
        out.push('\n');
    }
    out.push_str("//\n");
    out
}

/// LOCUS names cannot contain whitespace; fall back to the id when unnamed.
fn locus_name(seq: &Sequence) -> String {
    let name = seq.name.trim();
    let name = if name.is_empty() { seq.id.as_str() } else { name };
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

fn locus_date(seq: &Sequence) -> String {
    [seq.modified_at.as_deref(), seq.created_at.as_deref()]
        .into_iter()
        .flatten()
        .find_map(genbank_date)
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// `2016-05-12T18:00:00Z` -> `12-MAY-2016`.
fn genbank_date(iso: &str) -> Option<String> {
    let bytes = iso.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year = iso.get(0..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: usize = iso.get(5..7)?.parse().ok()?;
    let day: u32 = iso.get(8..10)?.parse().ok()?;
    let month = MONTHS.get(month.checked_sub(1)?)?;
    if !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{:02}-{}-{}", day, month, year))
}

/// Greedy word wrap to `width` columns. Words are broken only when a single
/// word is longer than a whole line.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        let line_len = line.chars().count();
        if line_len > 0 && line_len + 1 + word.len() <= width {
            line.push(' ');
            line.extend(word.iter());
            continue;
        }
        if line_len > 0 {
            lines.push(std::mem::take(&mut line));
        }
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        line.extend(word.iter());
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Header keyword in the first 12 columns, text word-wrapped to 79.
fn push_header(out: &mut String, key: &str, text: &str) {
    let lines = wrap_words(text, 79 - HEADER_INDENT);
    if lines.is_empty() {
        out.push_str(key);
        out.push('\n');
        return;
    }
    for (i, line) in lines.iter().enumerate() {
        let lead = if i == 0 { key } else { "" };
        out.push_str(&format!("{:<width$}{}\n", lead, line, width = HEADER_INDENT));
    }
}

/// GenBank location for a 0-based, end-exclusive span. Spans that cross
/// the origin of a circular sequence become a join of the two pieces.
fn location(start: usize, end: usize, strand: i8, len: usize, circular: bool) -> String {
    let span = if circular && start >= end && end > 0 && start < len {
        format!("join({}..{},1..{})", start + 1, len, end)
    } else {
        format!("{}..{}", start + 1, end)
    };
    if strand < 0 {
        format!("complement({})", span)
    } else {
        span
    }
}

fn push_annotation(out: &mut String, a: &Annotation, seq: &Sequence) {
    let key = a
        .feature_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("misc_feature");
    let loc = location(a.start, a.end, a.strand, seq.bases.len(), seq.circular);
    let mut qualifiers = Vec::new();
    if !a.name.is_empty() {
        qualifiers.push(("label", a.name.as_str()));
    }
    if let Some(desc) = a.description.as_deref().filter(|d| !d.is_empty()) {
        qualifiers.push(("note", desc));
    }
    push_feature(out, key, &loc, &qualifiers);
}

fn push_primer(out: &mut String, p: &Primer, seq: &Sequence) {
    let loc = location(p.start, p.end, p.strand, seq.bases.len(), seq.circular);
    let mut qualifiers = Vec::new();
    if let Some(name) = p.name.as_deref().filter(|n| !n.is_empty()) {
        qualifiers.push(("label", name));
    }
    push_feature(out, "primer_bind", &loc, &qualifiers);
}

fn push_feature(out: &mut String, key: &str, location: &str, qualifiers: &[(&str, &str)]) {
    out.push_str(&format!("     {:<16}{}\n", key, location));
    let indent = " ".repeat(FEATURE_INDENT);
    for (name, value) in qualifiers {
        let text = format!("/{}=\"{}\"", name, value.replace('"', "\"\""));
        for line in wrap_words(&text, QUALIFIER_WIDTH) {
            out.push_str(&indent);
            out.push_str(&line);
            out.push('\n');
        }
    }
}
