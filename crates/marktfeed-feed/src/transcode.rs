//! Transcoder: [`SourceItem`]s into the configured advertisement dialect.
//!
//! Field derivation (identifier fallback, price parsing, image collection)
//! is shared; the two schema variants differ only in text handling
//! (cleaned plain text vs. raw CDATA), price encoding (cents vs. two-digit
//! decimal), and document structure.

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_decimal::Decimal;

use marktfeed_core::{ListingConfig, SchemaVariant, ShippingOption};

use crate::clean::{clean_text, truncate_chars, truncate_with_ellipsis};
use crate::error::FeedError;
use crate::price::{parse_price, to_decimal_string, to_minor_units};
use crate::source::SourceItem;

/// Namespace bound to the `admarkt` prefix in the namespaced dialect.
pub const ADMARKT_NS: &str = "http://admarkt.marktplaats.nl/schemas/1.0";

const TITLE_MAX_CHARS: usize = 60;
const DESCRIPTION_MAX_CHARS: usize = 4000;

/// Per-item ad fields shared by both serializers. Text is still raw
/// (trimmed) at this point; cleaning is a serialization concern.
struct Ad {
    external_id: String,
    title: String,
    description: String,
    price: Option<Decimal>,
    url: String,
    images: Vec<String>,
}

impl Ad {
    fn derive(item: &SourceItem) -> Self {
        // Every ad needs some stable identifier even when the feed omits
        // explicit ids: id, then GTIN, then the product link itself.
        let external_id = item
            .id
            .clone()
            .or_else(|| item.gtin.clone())
            .or_else(|| item.link.clone())
            .unwrap_or_default();

        let mut images = Vec::new();
        if let Some(primary) = &item.image_url {
            images.push(primary.clone());
        }
        images.extend(item.additional_image_urls.iter().cloned());

        Ad {
            external_id,
            title: item.title.clone().unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price_raw.as_deref().and_then(parse_price),
            url: item.link.clone().unwrap_or_default(),
            images,
        }
    }
}

/// Serialize `items` as the target feed document for the configured schema
/// variant. Produces a complete UTF-8 document with an XML declaration.
///
/// # Errors
///
/// Returns [`FeedError::Write`] if event serialization fails.
pub fn transcode(items: &[SourceItem], cfg: &ListingConfig) -> Result<Vec<u8>, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    match cfg.schema {
        SchemaVariant::Plain => write_plain_feed(&mut writer, items, cfg)?,
        SchemaVariant::Admarkt => write_admarkt_feed(&mut writer, items, cfg)?,
    }

    Ok(writer.into_inner())
}

fn text_el<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn cdata_el<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::CData(BytesCData::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Flat Dutch dialect: cleaned plain text, minor-unit price, media block
/// omitted when the item has no images, one shared shipping list.
fn write_plain_feed<W: Write>(
    writer: &mut Writer<W>,
    items: &[SourceItem],
    cfg: &ListingConfig,
) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new("ads")))?;

    for item in items {
        let ad = Ad::derive(item);
        writer.write_event(Event::Start(BytesStart::new("ad")))?;

        text_el(writer, "leveranciers-id", &ad.external_id)?;
        text_el(writer, "verkopersnaam", &cfg.seller_name)?;
        text_el(
            writer,
            "titel",
            &truncate_with_ellipsis(&clean_text(&ad.title), TITLE_MAX_CHARS),
        )?;
        text_el(
            writer,
            "beschrijving",
            &truncate_chars(&clean_text(&ad.description), DESCRIPTION_MAX_CHARS),
        )?;
        text_el(writer, "categorie-id", &cfg.category_id)?;

        if let Some(price) = ad.price {
            text_el(writer, "prijs-type", &cfg.price_type)?;
            text_el(writer, "prijs", &to_minor_units(price).to_string())?;
        }

        text_el(writer, "url", &ad.url)?;

        if !ad.images.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("media")))?;
            for image in &ad.images {
                text_el(writer, "url", image)?;
            }
            writer.write_event(Event::End(BytesEnd::new("media")))?;
        }

        writer.write_event(Event::Start(BytesStart::new("kenmerken")))?;
        let mut kenmerk = BytesStart::new("kenmerk");
        kenmerk.push_attribute(("naam", "Voorwaarde"));
        writer.write_event(Event::Start(kenmerk))?;
        writer.write_event(Event::Text(BytesText::new(&cfg.condition)))?;
        writer.write_event(Event::End(BytesEnd::new("kenmerk")))?;
        writer.write_event(Event::End(BytesEnd::new("kenmerken")))?;

        writer.write_event(Event::Start(BytesStart::new("locatie")))?;
        text_el(writer, "postcode", &cfg.zipcode)?;
        if let Some(city) = &cfg.city {
            text_el(writer, "plaats", city)?;
        }
        writer.write_event(Event::End(BytesEnd::new("locatie")))?;

        if let Some(phone) = &cfg.phone {
            text_el(writer, "telefoonnummer", phone)?;
        }
        if let Some(email) = &cfg.email {
            text_el(writer, "emailadres", email)?;
        }
        text_el(writer, "status", &cfg.status)?;

        writer.write_event(Event::Start(BytesStart::new("verzendopties")))?;
        for option in &cfg.shipping_options {
            writer.write_event(Event::Start(BytesStart::new("verzendoptie")))?;
            match option {
                ShippingOption::Pickup { postcode } => {
                    text_el(writer, "type", "OPHALEN")?;
                    text_el(writer, "postcode", postcode)?;
                }
                ShippingOption::Delivery {
                    cost_cents,
                    description,
                    delivery_time,
                } => {
                    text_el(writer, "type", "VERZENDEN")?;
                    text_el(writer, "kosten", &cost_cents.to_string())?;
                    if let Some(description) = description {
                        text_el(writer, "omschrijving", description)?;
                    }
                    if let Some(delivery_time) = delivery_time {
                        text_el(writer, "levertijd", delivery_time)?;
                    }
                }
            }
            writer.write_event(Event::End(BytesEnd::new("verzendoptie")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("verzendopties")))?;

        writer.write_event(Event::End(BytesEnd::new("ad")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("ads")))?;
    Ok(())
}

/// Namespaced dialect: raw text in CDATA, two-digit decimal price with a
/// currency attribute, always-present media container, and one
/// `shippingOptions` wrapper per option.
fn write_admarkt_feed<W: Write>(
    writer: &mut Writer<W>,
    items: &[SourceItem],
    cfg: &ListingConfig,
) -> Result<(), FeedError> {
    let mut root = BytesStart::new("admarkt:ads");
    root.push_attribute(("xmlns:admarkt", ADMARKT_NS));
    writer.write_event(Event::Start(root))?;

    for item in items {
        let ad = Ad::derive(item);
        writer.write_event(Event::Start(BytesStart::new("admarkt:ad")))?;

        text_el(writer, "admarkt:externalId", &ad.external_id)?;
        text_el(writer, "admarkt:sellerName", &cfg.seller_name)?;
        cdata_el(writer, "admarkt:title", &ad.title)?;
        cdata_el(writer, "admarkt:description", &ad.description)?;
        text_el(writer, "admarkt:categoryId", &cfg.category_id)?;

        if let Some(price) = ad.price {
            text_el(writer, "admarkt:priceType", &cfg.price_type)?;
            let mut price_el = BytesStart::new("admarkt:price");
            price_el.push_attribute(("currency", "EUR"));
            writer.write_event(Event::Start(price_el))?;
            writer.write_event(Event::Text(BytesText::new(&to_decimal_string(price))))?;
            writer.write_event(Event::End(BytesEnd::new("admarkt:price")))?;
        }

        text_el(writer, "admarkt:url", &ad.url)?;

        // Always present, zero or more children.
        writer.write_event(Event::Start(BytesStart::new("admarkt:media")))?;
        for image in &ad.images {
            let mut image_el = BytesStart::new("admarkt:image");
            image_el.push_attribute(("url", image.as_str()));
            writer.write_event(Event::Empty(image_el))?;
        }
        writer.write_event(Event::End(BytesEnd::new("admarkt:media")))?;

        let mut attribute = BytesStart::new("admarkt:attribute");
        attribute.push_attribute(("name", "Voorwaarde"));
        writer.write_event(Event::Start(attribute))?;
        writer.write_event(Event::Text(BytesText::new(&cfg.condition)))?;
        writer.write_event(Event::End(BytesEnd::new("admarkt:attribute")))?;

        writer.write_event(Event::Start(BytesStart::new("admarkt:location")))?;
        text_el(writer, "admarkt:zipcode", &cfg.zipcode)?;
        if let Some(city) = &cfg.city {
            text_el(writer, "admarkt:city", city)?;
        }
        writer.write_event(Event::End(BytesEnd::new("admarkt:location")))?;

        if let Some(phone) = &cfg.phone {
            text_el(writer, "admarkt:phoneNumber", phone)?;
        }
        if let Some(email) = &cfg.email {
            text_el(writer, "admarkt:emailAddress", email)?;
        }
        text_el(writer, "admarkt:status", &cfg.status)?;

        // This dialect wraps every shipping option in its own wrapper
        // element instead of one shared list.
        for option in &cfg.shipping_options {
            writer.write_event(Event::Start(BytesStart::new("admarkt:shippingOptions")))?;
            writer.write_event(Event::Start(BytesStart::new("admarkt:shippingOption")))?;
            match option {
                ShippingOption::Pickup { postcode } => {
                    text_el(writer, "admarkt:type", "OPHALEN")?;
                    text_el(writer, "admarkt:postcode", postcode)?;
                }
                ShippingOption::Delivery {
                    cost_cents,
                    description,
                    delivery_time,
                } => {
                    text_el(writer, "admarkt:type", "VERZENDEN")?;
                    text_el(writer, "admarkt:cost", &cost_cents.to_string())?;
                    if let Some(description) = description {
                        text_el(writer, "admarkt:description", description)?;
                    }
                    if let Some(delivery_time) = delivery_time {
                        text_el(writer, "admarkt:deliveryTime", delivery_time)?;
                    }
                }
            }
            writer.write_event(Event::End(BytesEnd::new("admarkt:shippingOption")))?;
            writer.write_event(Event::End(BytesEnd::new("admarkt:shippingOptions")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("admarkt:ad")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("admarkt:ads")))?;
    Ok(())
}
