//! Length-preserving case folding.
//!
//! Search offsets are character indices, so folding must map every char to
//! exactly one char. Characters whose uppercase form expands to several
//! chars (`ß` → `SS`, `ŉ` → `ʼN`) are left unchanged.

/// Fold a single character to its single-char uppercase form.
#[inline]
#[must_use]
pub fn fold_char(c: char) -> char {
    single(c.to_uppercase()).unwrap_or(c)
}

/// Fold a whole string char-by-char; the result has the same char count.
#[must_use]
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Case-insensitive equality of two strings, compared char-by-char.
///
/// Two chars match when they are equal, or equal after single-char
/// uppercasing, or equal after single-char lowercasing.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    let mut a = a.chars();
    let mut b = b.chars();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if chars_eq_ignore_case(x, y) => {}
            _ => return false,
        }
    }
}

fn chars_eq_ignore_case(x: char, y: char) -> bool {
    if x == y || fold_char(x) == fold_char(y) {
        return true;
    }
    let lx = single(x.to_lowercase()).unwrap_or(x);
    let ly = single(y.to_lowercase()).unwrap_or(y);
    lx == ly
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let first = it.next()?;
    match it.next() {
        None => Some(first),
        Some(_) => None,
    }
}
