//! Extracts the ranked college names from a counselor completion.
//!
//! The model ends its answer with `1 - Name  2 - Name  3 - Name`. Markers may
//! also be split across lines or written as `1.` / `1)`.

#[derive(Debug, Clone, Copy)]
struct Marker {
    rank: u32,
    start: usize,
    name_start: usize,
}

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '–' | '—' | '.' | ')' | ':')
}

/// Every `<rank><sep><space>` occurrence for ranks 1–3, in text order.
fn find_markers(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for (i, c) in text.char_indices() {
        let Some(rank) = c.to_digit(10).filter(|d| (1..=3).contains(d)) else {
            continue;
        };
        if text[..i]
            .chars()
            .next_back()
            .is_some_and(|prev| prev.is_alphanumeric() || prev == '.')
        {
            continue;
        }
        let after = text[i + c.len_utf8()..].trim_start_matches([' ', '\t']);
        let mut chars = after.chars();
        if !chars.next().is_some_and(is_separator) {
            continue;
        }
        let body = chars.as_str();
        if !body.starts_with(char::is_whitespace) {
            continue;
        }
        markers.push(Marker {
            rank,
            start: i,
            name_start: text.len() - body.len(),
        });
    }
    markers
}

fn clean_name(segment: &str) -> &str {
    let line = segment.trim_start().lines().next().unwrap_or("");
    line.trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '"' | '.' | ',' | ';'))
}

/// Returns up to three recommended college names in rank order.
///
/// The list is anchored at the last `1` marker so that numbered phrases
/// earlier in the paragraph do not shift the ranking. Stops at the first
/// missing rank.
pub fn parse_recommendations(content: &str) -> Vec<String> {
    let markers = find_markers(content);
    let Some(anchor) = markers.iter().rposition(|m| m.rank == 1) else {
        return Vec::new();
    };

    let mut chain = vec![markers[anchor]];
    let mut cursor = anchor + 1;
    for rank in 2..=3 {
        match markers[cursor..].iter().position(|m| m.rank == rank) {
            Some(offset) => {
                chain.push(markers[cursor + offset]);
                cursor += offset + 1;
            }
            None => break,
        }
    }

    let mut names = Vec::with_capacity(chain.len());
    for (idx, marker) in chain.iter().enumerate() {
        let end = chain
            .get(idx + 1)
            .map(|next| next.start)
            .unwrap_or(content.len());
        let name = clean_name(&content[marker.name_start..end]);
        if name.is_empty() {
            break;
        }
        names.push(name.to_string());
    }
    names
}
