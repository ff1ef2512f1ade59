//! Line wrapping against measured text width.

use crate::surface::{FontSpec, Surface};

/// Split `text` into display lines no wider than `max_width`.
///
/// Explicit newlines always break. A line that fits is kept whole; otherwise
/// words are packed greedily. A single word wider than `max_width` gets a
/// line of its own rather than being split.
pub fn wrap_lines(surface: &dyn Surface, text: &str, max_width: f32, font: FontSpec) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        if surface.measure_text(raw, font) <= max_width {
            lines.push(raw.to_string());
            continue;
        }

        let mut words = raw.split(' ');
        let mut current = words.next().unwrap_or_default().to_string();
        for word in words {
            let candidate = format!("{} {}", current, word);
            if surface.measure_text(&candidate, font) < max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}
