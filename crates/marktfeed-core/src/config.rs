use crate::app_config::{AppConfig, ListingConfig, SchemaVariant, ShippingOption};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let feed_url = require("MARKTFEED_FEED_URL")?;
    let seller_name = require("MARKTFEED_SELLER_NAME")?;

    let mut bind_addr = {
        let raw = or_default("MARKTFEED_BIND_ADDR", "0.0.0.0:8080");
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "MARKTFEED_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?
    };

    // PaaS convention: a bare PORT variable overrides the port component.
    if let Ok(port) = lookup("PORT") {
        let port = port.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "PORT".to_string(),
            reason: e.to_string(),
        })?;
        bind_addr.set_port(port);
    }

    let log_level = or_default("MARKTFEED_LOG_LEVEL", "info");
    let fetch_timeout_secs = parse_u64("MARKTFEED_FETCH_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("MARKTFEED_USER_AGENT", "marktfeed/0.1 (feed-transcoder)");

    let schema = parse_schema_variant(&or_default("MARKTFEED_SCHEMA_VARIANT", "plain"))?;

    let category_id = or_default("MARKTFEED_CATEGORY_ID", "396");
    let condition = or_default("MARKTFEED_CONDITION", "Nieuw");
    let price_type = or_default("MARKTFEED_PRICE_TYPE", "VASTE_PRIJS");
    let status = or_default("MARKTFEED_STATUS", "ACTIEF");
    let zipcode = or_default("MARKTFEED_ZIPCODE", "8921SR");
    let city = lookup("MARKTFEED_CITY").ok();
    let phone = lookup("MARKTFEED_PHONE").ok();
    let email = lookup("MARKTFEED_EMAIL").ok();

    let shipping_options = default_shipping_options(&zipcode);

    Ok(AppConfig {
        bind_addr,
        log_level,
        feed_url,
        fetch_timeout_secs,
        user_agent,
        listing: ListingConfig {
            seller_name,
            category_id,
            condition,
            price_type,
            status,
            zipcode,
            city,
            phone,
            email,
            shipping_options,
            schema,
        },
    })
}

/// Parse a string into a `SchemaVariant`.
fn parse_schema_variant(s: &str) -> Result<SchemaVariant, ConfigError> {
    match s {
        "plain" => Ok(SchemaVariant::Plain),
        "admarkt" => Ok(SchemaVariant::Admarkt),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MARKTFEED_SCHEMA_VARIANT".to_string(),
            reason: format!("unknown schema variant \"{other}\" (expected plain or admarkt)"),
        }),
    }
}

/// The deployment's fixed shipping set: pickup at the seller's postcode plus
/// free delivery above the store threshold.
fn default_shipping_options(zipcode: &str) -> Vec<ShippingOption> {
    vec![
        ShippingOption::Pickup {
            postcode: zipcode.to_string(),
        },
        ShippingOption::Delivery {
            cost_cents: 0,
            description: Some("Gratis vanaf \u{20ac}49,-".to_string()),
            delivery_time: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("MARKTFEED_FEED_URL", "https://shop.example.com/feed.xml");
        m.insert("MARKTFEED_SELLER_NAME", "Aquariumhuis Friesland");
        m
    }

    #[test]
    fn build_app_config_fails_without_feed_url() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("MARKTFEED_SELLER_NAME", "Aquariumhuis Friesland");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "MARKTFEED_FEED_URL"),
            "expected MissingEnvVar(MARKTFEED_FEED_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_seller_name() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("MARKTFEED_FEED_URL", "https://shop.example.com/feed.xml");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "MARKTFEED_SELLER_NAME"),
            "expected MissingEnvVar(MARKTFEED_SELLER_NAME), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.fetch_timeout_secs, 15);
        assert_eq!(cfg.user_agent, "marktfeed/0.1 (feed-transcoder)");
        assert_eq!(cfg.listing.schema, SchemaVariant::Plain);
        assert_eq!(cfg.listing.category_id, "396");
        assert_eq!(cfg.listing.condition, "Nieuw");
        assert_eq!(cfg.listing.price_type, "VASTE_PRIJS");
        assert_eq!(cfg.listing.status, "ACTIEF");
        assert_eq!(cfg.listing.zipcode, "8921SR");
        assert!(cfg.listing.city.is_none());
        assert!(cfg.listing.phone.is_none());
        assert!(cfg.listing.email.is_none());
    }

    #[test]
    fn build_app_config_default_shipping_set() {
        let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
        assert_eq!(cfg.listing.shipping_options.len(), 2);
        assert!(matches!(
            &cfg.listing.shipping_options[0],
            ShippingOption::Pickup { postcode } if postcode == "8921SR"
        ));
        assert!(matches!(
            &cfg.listing.shipping_options[1],
            ShippingOption::Delivery { cost_cents: 0, .. }
        ));
    }

    #[test]
    fn build_app_config_pickup_follows_zipcode_override() {
        let mut map = full_env();
        map.insert("MARKTFEED_ZIPCODE", "1012AB");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(matches!(
            &cfg.listing.shipping_options[0],
            ShippingOption::Pickup { postcode } if postcode == "1012AB"
        ));
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = full_env();
        map.insert("MARKTFEED_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKTFEED_BIND_ADDR"),
            "expected InvalidEnvVar(MARKTFEED_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_port_overrides_bind_addr_port() {
        let mut map = full_env();
        map.insert("MARKTFEED_BIND_ADDR", "0.0.0.0:8080");
        map.insert("PORT", "10000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.bind_addr.port(), 10_000);
    }

    #[test]
    fn build_app_config_invalid_port_is_rejected() {
        let mut map = full_env();
        map.insert("PORT", "not-a-port");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORT"),
            "expected InvalidEnvVar(PORT), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fetch_timeout_override() {
        let mut map = full_env();
        map.insert("MARKTFEED_FETCH_TIMEOUT_SECS", "20");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 20);
    }

    #[test]
    fn build_app_config_fetch_timeout_invalid() {
        let mut map = full_env();
        map.insert("MARKTFEED_FETCH_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKTFEED_FETCH_TIMEOUT_SECS"),
            "expected InvalidEnvVar(MARKTFEED_FETCH_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn parse_schema_variant_plain() {
        assert_eq!(parse_schema_variant("plain").unwrap(), SchemaVariant::Plain);
    }

    #[test]
    fn parse_schema_variant_admarkt() {
        assert_eq!(
            parse_schema_variant("admarkt").unwrap(),
            SchemaVariant::Admarkt
        );
    }

    #[test]
    fn parse_schema_variant_unknown_is_rejected() {
        let result = parse_schema_variant("sandwich");
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKTFEED_SCHEMA_VARIANT"),
            "expected InvalidEnvVar(MARKTFEED_SCHEMA_VARIANT), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_schema_variant_override() {
        let mut map = full_env();
        map.insert("MARKTFEED_SCHEMA_VARIANT", "admarkt");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.listing.schema, SchemaVariant::Admarkt);
    }

    #[test]
    fn build_app_config_optional_contact_fields() {
        let mut map = full_env();
        map.insert("MARKTFEED_PHONE", "058-1234567");
        map.insert("MARKTFEED_EMAIL", "info@example.com");
        map.insert("MARKTFEED_CITY", "Leeuwarden");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.listing.phone.as_deref(), Some("058-1234567"));
        assert_eq!(cfg.listing.email.as_deref(), Some("info@example.com"));
        assert_eq!(cfg.listing.city.as_deref(), Some("Leeuwarden"));
    }
}
