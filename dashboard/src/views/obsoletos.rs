use super::{pad, render_with};
use crate::hooks::ApiState;
use payloads::responses::Obsoletos;

pub const PATH: &str = "/api/obsoletos";

pub fn render(state: &ApiState) -> String {
    render_with(state, "near-expiry products", render_obsoletos)
}

pub fn render_obsoletos(obsoletos: &Obsoletos) -> String {
    if obsoletos.is_empty() {
        return "No products close to expiry.".to_string();
    }
    obsoletos
        .iter()
        .map(|(sku, items)| {
            let unit = if items.len() == 1 { "unit" } else { "units" };
            format!("{} {} {unit}", pad(&sku.to_string(), 14), items.len())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::FetchState;
    use serde_json::json;

    #[test]
    fn counts_units_per_sku() {
        let state = ApiState {
            data: FetchState::Fetched(json!({
                "MICRO-BAS": [{"_id": "1"}, {"_id": "2"}],
                "ALU-PURO": [{"_id": "3"}]
            })),
            loading: false,
            error: None,
        };
        assert_eq!(
            render(&state),
            "ALU-PURO       1 unit\nMICRO-BAS      2 units"
        );
    }

    #[test]
    fn empty_object_means_nothing_expiring() {
        let state = ApiState {
            data: FetchState::Fetched(json!({})),
            loading: false,
            error: None,
        };
        assert_eq!(render(&state), "No products close to expiry.");
    }
}
