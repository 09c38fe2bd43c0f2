use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `GROCERY_QUIET=1` (or `true`) silences decorative success lines.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("GROCERY_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
