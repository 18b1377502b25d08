//! Checksum and range validators applied to raw pattern matches.

/// Validates a matched text; `false` discards the match.
pub type Validator = fn(&str) -> bool;

/// Narrows a matched text to the byte range `start..end` worth reporting;
/// `None` discards the match.
pub type Trimmer = fn(&str) -> Option<(usize, usize)>;

fn digits(text: &str) -> Vec<u32> {
    text.chars().filter_map(|ch| ch.to_digit(10)).collect()
}

/// Luhn checksum over the digits of `text`, 13 to 19 digits long.
pub fn luhn(text: &str) -> bool {
    let digits = digits(text);
    if !(13..=19).contains(&digits.len()) {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// Phone numbers carry 7 to 15 digits (E.164 upper bound).
pub fn phone_digits(text: &str) -> bool {
    (7..=15).contains(&digits(text).len())
}

/// US social security number shape rules: consistent separators, area not
/// `000`, `666` or `9xx`, group not `00`, serial not `0000`.
pub fn us_ssn(text: &str) -> bool {
    let separators: Vec<char> = text.chars().filter(|ch| !ch.is_ascii_digit()).collect();
    if separators.windows(2).any(|pair| pair[0] != pair[1]) {
        return false;
    }
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 9 {
        return false;
    }
    let (area, rest) = digits.split_at(3);
    let (group, serial) = rest.split_at(2);
    area != "000"
        && area != "666"
        && !area.starts_with('9')
        && group != "00"
        && serial != "0000"
}

/// Dotted-quad IPv4 with every octet in `0..=255` and no leading zeros.
pub fn ipv4(text: &str) -> bool {
    let octets: Vec<&str> = text.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            !octet.is_empty()
                && (octet.len() == 1 || !octet.starts_with('0'))
                && octet.parse::<u8>().is_ok()
        })
}

/// IBAN mod-97 check (ISO 13616); spaces are ignored.
pub fn iban(text: &str) -> bool {
    let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    if !(15..=34).contains(&compact.len()) || !compact.is_ascii() {
        return false;
    }
    let (head, tail) = compact.split_at(4);
    let mut remainder: u32 = 0;
    for ch in tail.chars().chain(head.chars()) {
        let value = match ch.to_digit(36) {
            Some(value) => value,
            None => return false,
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }
    remainder == 1
}

/// Calendar sanity for `YYYY-MM-DD` or `DD/MM/YYYY`-style dates.
///
/// Day-first and month-first orders are both accepted for slash dates.
pub fn calendar_date(text: &str) -> bool {
    let parts: Vec<u32> = text
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();
    if parts.len() < 3 {
        return false;
    }
    let in_range = |month: u32, day: u32| (1..=12).contains(&month) && (1..=31).contains(&day);
    if text.chars().nth(4) == Some('-') {
        in_range(parts[1], parts[2])
    } else {
        in_range(parts[1], parts[0]) || in_range(parts[0], parts[1])
    }
}

const NON_NAME_WORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "And", "Or", "Of", "In", "On", "At", "For", "With",
    "From", "To", "Dear", "Hello", "Thanks", "Monday", "Tuesday", "Wednesday", "Thursday",
    "Friday", "Saturday", "Sunday", "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December", "Street", "Road",
    "Avenue", "Lane", "Drive", "Boulevard", "Inc", "Ltd", "Company", "Corporation",
    "University", "Hospital", "Bank", "New", "North", "South", "East", "West", "United",
    "States", "Kingdom",
];

fn is_non_name(token: &str) -> bool {
    token.split('-').any(|word| NON_NAME_WORDS.contains(&word))
}

/// Drops non-name words from both ends of a capitalized run.
///
/// `"Dear John Smith"` narrows to `"John Smith"`. The rest must still hold
/// two name parts and no non-name word.
pub fn person_name_span(text: &str) -> Option<(usize, usize)> {
    let tokens: Vec<(usize, &str)> = text
        .split(' ')
        .scan(0, |offset, token| {
            let start = *offset;
            *offset += token.len() + 1;
            Some((start, token))
        })
        .filter(|(_, token)| !token.is_empty())
        .collect();
    let first = tokens.iter().position(|(_, token)| !is_non_name(token))?;
    let last = tokens.iter().rposition(|(_, token)| !is_non_name(token))?;
    let kept = &tokens[first..=last];
    let parts: usize = kept.iter().map(|(_, token)| token.split('-').count()).sum();
    if parts < 2 || kept.iter().any(|(_, token)| is_non_name(token)) {
        return None;
    }
    let (start, _) = kept[0];
    let (last_start, last_token) = kept[kept.len() - 1];
    Some((start, last_start + last_token.len()))
}
