//! URL slugs in cut Latin.

use super::Transliterator;

/// Build an ASCII slug: cut-Latin conversion, lowercase, runs of anything
/// other than ASCII letters and digits collapsed into `-`.
pub fn slugify(text: &str) -> String {
    let latin = Transliterator.to_cut_latin(text);
    let mut slug = String::with_capacity(latin.len());
    let mut pending_dash = false;

    for c in latin.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
