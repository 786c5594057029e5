use serde::Serialize;

/// One inventory record, stored exactly as the client submitted it.
///
/// The non-empty name / positive quantity rules are checked when a record
/// enters the store, never afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub name: String,
    pub quantity: i64,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_wire_shape() {
        let item = Item::new("Apples", 3);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({ "name": "Apples", "quantity": 3 })
        );
    }

    #[test]
    fn name_is_kept_untrimmed() {
        let item = Item::new("  Pears ", 2);
        assert_eq!(item.name, "  Pears ");
    }
}
