use std::net::SocketAddr;

/// Target schema dialect for the generated advertisement feed.
///
/// The two dialects share all field-mapping logic and differ only in
/// structure: `Plain` is the flat Dutch-element dialect with cleaned text and
/// a minor-unit (cents) price; `Admarkt` is the namespaced dialect with
/// CDATA-wrapped text and a two-decimal price carrying a currency attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Plain,
    Admarkt,
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVariant::Plain => write!(f, "plain"),
            SchemaVariant::Admarkt => write!(f, "admarkt"),
        }
    }
}

/// One shipping option attached to every generated ad.
///
/// The source feed carries no shipping data; the set is deployment
/// configuration copied verbatim into each ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingOption {
    /// Buyer collects at the given postcode.
    Pickup { postcode: String },
    /// Seller ships; cost in cents plus an optional human-readable
    /// description and/or delivery-time indication.
    Delivery {
        cost_cents: u32,
        description: Option<String>,
        delivery_time: Option<String>,
    },
}

/// Listing constants stamped into every generated ad.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub seller_name: String,
    pub category_id: String,
    pub condition: String,
    pub price_type: String,
    pub status: String,
    pub zipcode: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub shipping_options: Vec<ShippingOption>,
    pub schema: SchemaVariant,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub feed_url: String,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub listing: ListingConfig,
}
