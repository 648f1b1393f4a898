use crate::domain::model::OrderTables;
use crate::utils::error::{BrightloomError, Result};
use serde_json::{Map, Value};

/// Flatten raw order records into four related tables: orders, line items,
/// applied taxes, and modifications. Child rows gain a foreign-key column
/// referencing their parent's `id`. Input order is preserved everywhere; no
/// deduplication or coercion happens.
pub fn flatten_orders(orders: &[Value]) -> Result<OrderTables> {
    let mut tables = OrderTables::default();

    for order in orders {
        let order_obj = as_object(order, "order")?;
        let order_id = require_field(order_obj, "id", "order")?.clone();

        for tax in require_array(order_obj, "applied_taxes", "order")? {
            let mut row = as_object(tax, "applied_taxes entry")?.clone();
            row.insert("order_id".to_string(), order_id.clone());
            tables.applied_taxes.push(row);
        }

        for line_item in require_array(order_obj, "line_items", "order")? {
            let item_obj = as_object(line_item, "line_items entry")?;
            let mut row = item_obj.clone();
            row.insert("order_id".to_string(), order_id.clone());
            tables.line_items.push(row);

            // modifications are optional on a line item
            let modifications = match item_obj.get("modifications") {
                Some(value) => as_array(value, "modifications")?,
                None => continue,
            };
            if modifications.is_empty() {
                continue;
            }

            let line_item_id = require_field(item_obj, "id", "line_items entry")?.clone();
            for modification in modifications {
                let mut row = as_object(modification, "modifications entry")?.clone();
                row.insert("line_item_id".to_string(), line_item_id.clone());
                tables.modifications.push(row);
            }
        }

        tables.orders.push(flatten_record(order_obj));
    }

    Ok(tables)
}

/// Flatten nested objects into a single-level map with `_`-joined keys.
/// Arrays and scalars are kept as-is under the joined key.
pub fn flatten_record(record: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(None, record, &mut flat);
    flat
}

fn flatten_into(prefix: Option<&str>, nested: &Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in nested {
        let joined = match prefix {
            Some(p) => format!("{}_{}", p, key),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(Some(&joined), inner, out),
            other => {
                out.insert(joined, other.clone());
            }
        }
    }
}

fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| BrightloomError::DataShapeError {
            message: format!("{} is not a JSON object", context),
        })
}

fn as_array<'a>(value: &'a Value, context: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| BrightloomError::DataShapeError {
            message: format!("{} is not a JSON array", context),
        })
}

fn require_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a Value> {
    object
        .get(field)
        .ok_or_else(|| BrightloomError::MissingFieldError {
            field: field.to_string(),
            context: context.to_string(),
        })
}

fn require_array<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a Vec<Value>> {
    as_array(require_field(object, field, context)?, field)
}
