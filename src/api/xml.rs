//! Conversion of registrar XML replies into a JSON tree.
//!
//! The tree mirrors the document: attributes become `@name` keys, element
//! text becomes a string (or `#text` when the element also has attributes or
//! children), repeated child elements become arrays and empty elements become
//! `null`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::client::ApiResult;
use super::error::ApiError;

struct Element {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> ApiResult<Self> {
        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(malformed)?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value().map_err(malformed)?.into_owned();
            attributes.insert(key, Value::String(value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return if self.text.is_empty() {
                Value::Null
            } else {
                Value::String(self.text)
            };
        }

        let mut map = self.attributes;
        map.extend(self.children);
        if !self.text.is_empty() {
            map.insert("#text".to_string(), Value::String(self.text));
        }
        Value::Object(map)
    }
}

pub fn xml_to_value(xml: &str) -> ApiResult<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = Map::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(Element::open(&start)?),
            Ok(Event::Empty(start)) => {
                let element = Element::open(&start)?;
                close(element, &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ApiError::InvalidResponse("Unexpected closing tag".into()))?;
                close(element, &mut stack, &mut root);
            }
            Ok(Event::Text(text)) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text.unescape().map_err(malformed)?);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(element) = stack.last_mut() {
                    element
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ApiError::InvalidResponse(format!(
                    "Malformed XML at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ApiError::InvalidResponse(format!(
            "Unclosed element <{}>",
            open.name
        )));
    }
    if root.is_empty() {
        return Err(ApiError::InvalidResponse("Empty XML document".into()));
    }

    Ok(Value::Object(root))
}

fn close(element: Element, stack: &mut [Element], root: &mut Map<String, Value>) {
    let parent = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => root,
    };
    let name = element.name.clone();
    insert_child(parent, name, element.into_value());
}

fn insert_child(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}

fn malformed(e: impl std::fmt::Display) -> ApiError {
    ApiError::InvalidResponse(format!("Malformed XML: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TWO_DOMAINS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <Warnings />
  <RequestedCommand>namecheap.domains.getList</RequestedCommand>
  <CommandResponse Type="namecheap.domains.getList">
    <DomainGetListResult>
      <Domain ID="127" Name="example.com" Expires="02/15/2026" AutoRenew="true" WhoisGuard="ENABLED" />
      <Domain ID="381" Name="other.com" Expires="11/30/2025" AutoRenew="false" WhoisGuard="NOTPRESENT" />
    </DomainGetListResult>
    <Paging>
      <TotalItems>2</TotalItems>
    </Paging>
  </CommandResponse>
  <ExecutionTime>0.011</ExecutionTime>
</ApiResponse>"#;

    #[test]
    fn test_attributes_children_and_lists() {
        let value = xml_to_value(TWO_DOMAINS).unwrap();
        let api = &value["ApiResponse"];

        assert_eq!(api["@Status"], "OK");
        assert_eq!(api["@xmlns"], "http://api.namecheap.com/xml.response");
        assert_eq!(api["Errors"], Value::Null);
        assert_eq!(api["RequestedCommand"], "namecheap.domains.getList");
        assert_eq!(api["CommandResponse"]["Paging"]["TotalItems"], "2");

        let domains = api["CommandResponse"]["DomainGetListResult"]["Domain"]
            .as_array()
            .unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[0]["@Name"], "example.com");
        assert_eq!(domains[1]["@AutoRenew"], "false");
    }

    #[test]
    fn test_single_child_stays_an_object() {
        let value = xml_to_value(
            r#"<R><List><Item Name="only.com" /></List></R>"#,
        )
        .unwrap();
        assert_eq!(value, json!({"R": {"List": {"Item": {"@Name": "only.com"}}}}));
    }

    #[test]
    fn test_text_next_to_attributes() {
        let value = xml_to_value(
            r#"<Errors><Error Number="1011102">Parameter APIKey is invalid &amp; rejected</Error></Errors>"#,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({"Errors": {"Error": {
                "@Number": "1011102",
                "#text": "Parameter APIKey is invalid & rejected"
            }}})
        );
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            xml_to_value("<a><b></a>"),
            Err(ApiError::InvalidResponse(_))
        ));
        assert!(matches!(
            xml_to_value("<a>"),
            Err(ApiError::InvalidResponse(_))
        ));
        assert!(matches!(
            xml_to_value("   "),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
