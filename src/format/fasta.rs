// FASTA output.

use crate::models::Sequence;

pub const LINE_WIDTH: usize = 60;

/// `>name` followed by the bases wrapped at [`LINE_WIDTH`].
pub fn to_fasta(seq: &Sequence) -> String {
    to_fasta_width(seq, LINE_WIDTH)
}

/// As [`to_fasta`] with a custom line width; 0 writes the bases on one line.
pub fn to_fasta_width(seq: &Sequence, width: usize) -> String {
    let mut out = String::with_capacity(seq.bases.len() + seq.name.len() + 8);
    out.push('>');
    out.push_str(&seq.name);
    out.push('\n');
    if seq.bases.is_empty() {
        return out;
    }
    let width = if width == 0 { seq.bases.len() } else { width };
    for line in seq.bases.as_bytes().chunks(width) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out
}
