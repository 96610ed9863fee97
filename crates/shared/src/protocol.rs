//! JSON shapes exchanged with the remote customer list.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Customer, CustomerId};

/// Hyperlink column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    #[serde(rename = "Url")]
    pub url: String,
}

/// A list item as returned by the list service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "CustomerName", default, deserialize_with = "nullable_string")]
    pub customer_name: String,
    #[serde(rename = "Address", default, deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(rename = "NumberofRigs", default, deserialize_with = "count")]
    pub number_of_rigs: u32,
    #[serde(rename = "NumberofJackUps", default, deserialize_with = "count")]
    pub number_of_jack_ups: u32,
    #[serde(rename = "NumberofMODU_x2019_s", default, deserialize_with = "count")]
    pub number_of_modus: u32,
    #[serde(rename = "SiteURLs", default)]
    pub site_urls: Option<Hyperlink>,
}

impl From<ListItem> for Customer {
    fn from(item: ListItem) -> Self {
        Self {
            id: Some(CustomerId(item.id)),
            name: item.customer_name,
            address: item.address,
            rig_count: item.number_of_rigs,
            jack_up_count: item.number_of_jack_ups,
            modu_count: item.number_of_modus,
            site_url: item
                .site_urls
                .map(|link| link.url)
                .filter(|url| !url.is_empty()),
        }
    }
}

/// `{"value": [...]}` listing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItemsEnvelope {
    pub value: Vec<ListItem>,
}

/// Body of an add or update request. `SiteURLs` is always present so that an
/// absent URL clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemWrite {
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "NumberofRigs")]
    pub number_of_rigs: u32,
    #[serde(rename = "NumberofJackUps")]
    pub number_of_jack_ups: u32,
    #[serde(rename = "NumberofMODU_x2019_s")]
    pub number_of_modus: u32,
    #[serde(rename = "SiteURLs")]
    pub site_urls: Option<Hyperlink>,
}

impl From<&Customer> for ListItemWrite {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_name: customer.name.clone(),
            address: customer.address.clone(),
            number_of_rigs: customer.rig_count,
            number_of_jack_ups: customer.jack_up_count,
            number_of_modus: customer.modu_count,
            site_urls: customer.normalized_site_url().map(|url| Hyperlink {
                url: url.to_string(),
            }),
        }
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Number columns come back as floats and may be null.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if !value.is_finite() || value <= 0.0 {
        return Ok(0);
    }
    Ok(value.min(u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_item_maps_wire_fields_onto_customer() {
        let item: ListItem = serde_json::from_value(json!({
            "Id": 7,
            "CustomerName": "Acme",
            "Address": "1 Dock Rd\nPort Town",
            "NumberofRigs": 2,
            "NumberofJackUps": 0.0,
            "NumberofMODU_x2019_s": 1,
            "SiteURLs": { "Url": "https://acme.example", "Description": "Acme site" }
        }))
        .expect("item");

        let customer = Customer::from(item);
        assert_eq!(customer.id, Some(CustomerId(7)));
        assert_eq!(customer.name, "Acme");
        assert_eq!(customer.address, "1 Dock Rd\nPort Town");
        assert_eq!(customer.rig_count, 2);
        assert_eq!(customer.jack_up_count, 0);
        assert_eq!(customer.modu_count, 1);
        assert_eq!(customer.site_url.as_deref(), Some("https://acme.example"));
    }

    #[test]
    fn list_item_tolerates_null_and_negative_columns() {
        let item: ListItem = serde_json::from_value(json!({
            "Id": 3,
            "CustomerName": "Borealis",
            "Address": null,
            "NumberofRigs": null,
            "NumberofJackUps": -4,
            "NumberofMODU_x2019_s": 2.9,
            "SiteURLs": null
        }))
        .expect("item");

        let customer = Customer::from(item);
        assert_eq!(customer.address, "");
        assert_eq!(customer.rig_count, 0);
        assert_eq!(customer.jack_up_count, 0);
        assert_eq!(customer.modu_count, 2);
        assert_eq!(customer.site_url, None);
    }

    #[test]
    fn write_payload_sends_null_hyperlink_for_empty_url() {
        let draft = Customer {
            name: "Acme".to_string(),
            address: "1 Dock Rd".to_string(),
            rig_count: 2,
            modu_count: 1,
            site_url: Some(String::new()),
            ..Customer::default()
        };

        let body = serde_json::to_value(ListItemWrite::from(&draft)).expect("serialize");
        assert_eq!(
            body,
            json!({
                "CustomerName": "Acme",
                "Address": "1 Dock Rd",
                "NumberofRigs": 2,
                "NumberofJackUps": 0,
                "NumberofMODU_x2019_s": 1,
                "SiteURLs": null
            })
        );
    }
}
