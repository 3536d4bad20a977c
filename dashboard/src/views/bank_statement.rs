use super::render_with;
use crate::hooks::ApiState;
use crate::utils::currency::format_clp;
use payloads::BankStatement;

pub const PATH: &str = "/api/get-bank-statement";

pub fn render(state: &ApiState) -> String {
    render_with(state, "financial data", |statement: &BankStatement| {
        let balance = statement.values.balance;
        let sign = if balance.is_sign_negative() && !balance.is_zero() {
            "negative"
        } else {
            "positive"
        };
        format!("Current balance: {} ({sign})", format_clp(balance))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::FetchState;
    use serde_json::json;

    fn statement(balance: serde_json::Value) -> ApiState {
        ApiState {
            data: FetchState::Fetched(json!({"values": {"balance": balance}})),
            loading: false,
            error: None,
        }
    }

    #[test]
    fn balance_is_formatted_as_pesos() {
        assert_eq!(
            render(&statement(json!(1234567))),
            "Current balance: $1.234.567 (positive)"
        );
        assert_eq!(
            render(&statement(json!(-4200))),
            "Current balance: -$4.200 (negative)"
        );
    }

    #[test]
    fn loading_uses_financial_context() {
        let state = ApiState {
            data: FetchState::NotFetched,
            loading: true,
            error: None,
        };
        assert_eq!(render(&state), "Loading financial data...");
    }
}
