use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Record(fields)
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Record(fields)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::Null => None,
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn number(&self, field: &str) -> f64 {
        let parsed = match self.0.get(field) {
            Some(Value::Number(value)) => value.as_f64(),
            Some(Value::String(value)) => value.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|value| value.is_finite()).unwrap_or(0.0)
    }

    pub fn id(&self, fallback_field: &str) -> Option<String> {
        self.text("id").or_else(|| self.text(fallback_field))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Record(fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        Record::from_value(value).expect("fixture should be an object")
    }

    #[test]
    fn text_renders_scalars_and_hides_nulls() {
        let row = record(json!({
            "name": "Lamp",
            "inventory": 12,
            "active": true,
            "shop_name": null
        }));

        assert_eq!(row.text("name"), Some("Lamp".to_string()));
        assert_eq!(row.text("inventory"), Some("12".to_string()));
        assert_eq!(row.text("active"), Some("true".to_string()));
        assert_eq!(row.text("shop_name"), None);
        assert_eq!(row.text("missing"), None);
    }

    #[test]
    fn number_reads_numeric_strings_and_defaults_to_zero() {
        let row = record(json!({
            "product_sales": 40,
            "inventory": " 7.5 ",
            "rate": "n/a",
            "empty": null
        }));

        assert_eq!(row.number("product_sales"), 40.0);
        assert_eq!(row.number("inventory"), 7.5);
        assert_eq!(row.number("rate"), 0.0);
        assert_eq!(row.number("empty"), 0.0);
        assert_eq!(row.number("missing"), 0.0);
    }

    #[test]
    fn id_falls_back_to_resource_identifier() {
        let with_id = record(json!({ "id": 3, "product_id": "1729" }));
        let without_id = record(json!({ "product_id": "1729" }));

        assert_eq!(with_id.id("product_id"), Some("3".to_string()));
        assert_eq!(without_id.id("product_id"), Some("1729".to_string()));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("text")).is_none());
    }
}
