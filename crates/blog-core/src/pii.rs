//! Helpers for keeping personal data out of logs.

/// Mask the local part of an email address, keeping the first character.
///
/// `alice@example.com` becomes `a***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

/// Mask every email address appearing in free text, such as a mail subject.
///
/// Punctuation wrapped around an address is kept, so
/// `Ann (ann@example.com) recommends` becomes `Ann (a***@example.com) recommends`.
pub fn mask_emails_in(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if !word.contains('@') {
                return word.to_string();
            }
            let is_edge = |c: char| !(c.is_alphanumeric() || c == '@');
            let core = word.trim_matches(is_edge);
            let start = word.len() - word.trim_start_matches(is_edge).len();
            let end = start + core.len();
            format!("{}{}{}", &word[..start], mask_email(core), &word[end..])
        })
        .collect::<Vec<_>>()
        .join(" ")
}
