use std::env;

/// What to do with a requested line item whose inventory item does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemPolicy {
    /// Drop the line item from the booking and from the totals.
    Lenient,
    /// Reject the whole booking with a client error.
    Strict,
}

impl ItemPolicy {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => ItemPolicy::Strict,
            _ => ItemPolicy::Lenient,
        }
    }
}

/// Whether a partial update that changes `court_price` recomputes `final_total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalsOnUpdate {
    Recompute,
    Keep,
}

impl TotalsOnUpdate {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => TotalsOnUpdate::Keep,
            _ => TotalsOnUpdate::Recompute,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub item_policy: ItemPolicy,
    pub totals_on_update: TotalsOnUpdate,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "courtbook.db".to_string()),
            item_policy: env::var("ITEM_POLICY")
                .map(|v| ItemPolicy::parse(&v))
                .unwrap_or(ItemPolicy::Lenient),
            totals_on_update: env::var("TOTALS_ON_UPDATE")
                .map(|v| TotalsOnUpdate::parse(&v))
                .unwrap_or(TotalsOnUpdate::Recompute),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: ":memory:".to_string(),
            item_policy: ItemPolicy::Lenient,
            totals_on_update: TotalsOnUpdate::Recompute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_policy_parse() {
        assert_eq!(ItemPolicy::parse("strict"), ItemPolicy::Strict);
        assert_eq!(ItemPolicy::parse(" STRICT "), ItemPolicy::Strict);
        assert_eq!(ItemPolicy::parse("lenient"), ItemPolicy::Lenient);
        assert_eq!(ItemPolicy::parse("whatever"), ItemPolicy::Lenient);
    }

    #[test]
    fn test_totals_on_update_parse() {
        assert_eq!(TotalsOnUpdate::parse("keep"), TotalsOnUpdate::Keep);
        assert_eq!(TotalsOnUpdate::parse("recompute"), TotalsOnUpdate::Recompute);
        assert_eq!(TotalsOnUpdate::parse(""), TotalsOnUpdate::Recompute);
    }
}
