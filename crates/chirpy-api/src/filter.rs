const PROFANE: &[&str] = &["kerfuffle", "sharbert", "fornax"];
const CENSOR: &str = "****";

/// Replace whole space-separated profane words, ignoring case. Words with
/// punctuation attached are left alone.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE.contains(&word.to_lowercase().as_str()) {
                CENSOR
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
