use super::{pad, render_with};
use crate::hooks::ApiState;
use payloads::{Space, SpacesResponse};

pub const PATH: &str = "/api/spaces";

pub fn render(state: &ApiState) -> String {
    render_with(state, "spaces", |response: &SpacesResponse| {
        render_spaces(&response.spaces)
    })
}

pub fn render_spaces(spaces: &[Space]) -> String {
    if spaces.is_empty() {
        return "No spaces.".to_string();
    }
    spaces
        .iter()
        .map(|space| {
            format!(
                "{} {} / {}",
                pad(&space_label(&space.kind), 14),
                space.used_space,
                space.total_space
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"check-in"` becomes `"Check in"`.
pub fn space_label(kind: &str) -> String {
    let spaced = kind.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Spaces from a spaces hook, or none if it has not resolved yet.
pub fn known_spaces(state: &ApiState) -> Vec<Space> {
    match state.decode::<SpacesResponse>() {
        Some(Ok(response)) => response.spaces,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::FetchState;
    use serde_json::json;

    #[test]
    fn renders_utilization_per_space() {
        let state = ApiState {
            data: FetchState::Fetched(json!({
                "spaces": [
                    {"space_id": "A", "type": "buffer", "used_space": 3, "total_space": 10},
                    {"space_id": "B", "type": "check-in", "used_space": 0, "total_space": 4}
                ]
            })),
            loading: false,
            error: None,
        };
        assert_eq!(
            render(&state),
            "Buffer         3 / 10\nCheck in       0 / 4"
        );
        assert_eq!(known_spaces(&state).len(), 2);
    }

    #[test]
    fn labels_capitalise_first_letter_only() {
        assert_eq!(space_label("kitchen"), "Kitchen");
        assert_eq!(space_label("check-out"), "Check out");
        assert_eq!(space_label(""), "");
    }
}
