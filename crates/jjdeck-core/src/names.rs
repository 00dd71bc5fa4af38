use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("bookmark name must be between 1 and 128 characters")]
    InvalidLength,
    #[error("bookmark name cannot start with '-', '.' or '/'")]
    InvalidFirstCharacter,
    #[error("bookmark name cannot end with '/', '.' or '.lock'")]
    InvalidEnding,
    #[error("bookmark name contains invalid character '{character}'")]
    InvalidCharacter { character: char },
    #[error("bookmark name cannot contain '..' or '//'")]
    InvalidSequence,
}

pub fn validate_bookmark_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() || name.chars().count() > 128 {
        return Err(NameError::InvalidLength);
    }

    if name.starts_with(['-', '.', '/']) {
        return Err(NameError::InvalidFirstCharacter);
    }

    if name.ends_with(['/', '.']) || name.ends_with(".lock") {
        return Err(NameError::InvalidEnding);
    }

    if name.contains("..") || name.contains("//") {
        return Err(NameError::InvalidSequence);
    }

    for character in name.chars() {
        if character.is_control()
            || character.is_whitespace()
            || matches!(character, '~' | '^' | ':' | '?' | '*' | '[' | '\\' | '@')
        {
            return Err(NameError::InvalidCharacter { character });
        }
    }

    Ok(())
}

/// Extracts a ticket key such as `PROJ-123` from the start of a bookmark name.
pub fn ticket_prefix(bookmark: &str) -> Option<String> {
    let letters: String = bookmark
        .chars()
        .take_while(|character| character.is_ascii_alphanumeric())
        .collect();
    if letters.is_empty() || !letters.starts_with(|character: char| character.is_ascii_alphabetic())
    {
        return None;
    }

    let rest = bookmark[letters.len()..].strip_prefix('-')?;
    let digits: String = rest
        .chars()
        .take_while(|character| character.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }

    let boundary = rest[digits.len()..].chars().next();
    if boundary.is_some_and(|character| character.is_ascii_alphanumeric()) {
        return None;
    }

    Some(format!("{}-{digits}", letters.to_ascii_uppercase()))
}

pub fn bookmark_name_for_ticket(display_key: &str) -> String {
    let mut output = String::with_capacity(display_key.len());
    for character in display_key.trim().chars() {
        if character.is_ascii_alphanumeric() || character == '-' || character == '_' {
            output.push(character.to_ascii_lowercase());
        } else if !output.ends_with('-') {
            output.push('-');
        }
    }
    output.trim_matches('-').to_string()
}
