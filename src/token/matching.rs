//! Comparison of local tokens against published ones.
//!
//! Every pair is compared without early exit, so how long a comparison takes
//! does not depend on where a match was found or which bytes differ.

use subtle::{Choice, ConstantTimeEq};

/// Constant-time equality of two tokens.
#[must_use]
pub fn tokens_equal(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Whether `token` appears anywhere in `published`.
#[must_use]
pub fn contains_token<S: AsRef<str>>(published: &[S], token: &str) -> bool {
    published
        .iter()
        .fold(Choice::from(0), |found, candidate| {
            found | candidate.as_ref().as_bytes().ct_eq(token.as_bytes())
        })
        .into()
}

/// How many of `local` appear in `published`.
///
/// ```
/// use geotrace_core::token::matching::count_matching;
///
/// let mine = ["e0a9052ac6f3e604", "3fada939ff63cc62"];
/// let theirs = ["3fada939ff63cc62", "0000000000000000"];
/// assert_eq!(count_matching(&mine, &theirs), 1);
/// ```
#[must_use]
pub fn count_matching<L: AsRef<str>, P: AsRef<str>>(local: &[L], published: &[P]) -> usize {
    local
        .iter()
        .filter(|token| contains_token(published, token.as_ref()))
        .count()
}
