/// Registry key for a display name: lowercase, then keep only `a`..=`z`.
///
/// Spacing, punctuation and digits disappear, so `"United  States!!"` and
/// `"united states"` share a key. Letters outside ASCII are dropped rather
/// than transliterated (`"Curaçao"` becomes `"curaao"`).
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}
