// 🏗️ Timetable XML Parser
// Reads XmlMts/Mt/Trenuri/Tren/Trase/Trasa/ElementTrasa documents into typed rows.
//
// Elements are read lazily, one level at a time, so the importer can skip a
// whole subtree without ever looking at its attributes.

use crate::entities::{Route, RouteSegment, Train};
use crate::error::{ImportError, Result};
use roxmltree::{Document, Node};
use std::path::Path;

// ============================================================================
// ELEMENT NAMES
// ============================================================================

pub const ROOT_ELEMENT: &str = "XmlMts";
pub const TRAIN_ELEMENT: &str = "Tren";
pub const ROUTE_ELEMENT: &str = "Trasa";
pub const SEGMENT_ELEMENT: &str = "ElementTrasa";

// ============================================================================
// KEY EXTRACTION
// ============================================================================

/// Canonical train number: the integer formed by the leading decimal digits.
///
/// `"501X"` → 501, `"12-34"` → 12. Fails when `s` does not start with a digit.
pub fn train_number_from_str(s: &str) -> Result<i64> {
    let digits_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    s[..digits_end]
        .parse::<i64>()
        .map_err(|_| ImportError::NumberFormat {
            field: "Numar",
            value: s.to_string(),
        })
}

/// Station code, if the text is made only of decimal digits
pub fn station_code(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_int(field: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ImportError::NumberFormat {
            field,
            value: value.to_string(),
        })
}

// ============================================================================
// DOCUMENT ACCESS
// ============================================================================

/// Read a timetable file into memory
pub fn read_timetable(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse timetable text; `path` is only used for error reporting
pub fn parse_timetable<'i>(path: &Path, text: &'i str) -> Result<Document<'i>> {
    Document::parse(text).map_err(|source| ImportError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

fn children<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children().filter(move |n| n.has_tag_name(name))
}

/// All `Tren` elements of a document, in document order.
///
/// The document root may be `XmlMts` itself or wrap it.
pub fn train_elements<'a, 'i: 'a>(
    path: &Path,
    doc: &'a Document<'i>,
) -> Result<Vec<Node<'a, 'i>>> {
    let root = doc.root_element();
    let xml_mts = if root.has_tag_name(ROOT_ELEMENT) {
        Some(root)
    } else {
        children(root, ROOT_ELEMENT).next()
    };

    let trenuri = xml_mts
        .and_then(|n| children(n, "Mt").next())
        .and_then(|n| children(n, "Trenuri").next())
        .ok_or_else(|| ImportError::MissingElement {
            path: path.to_path_buf(),
            element: "XmlMts/Mt/Trenuri",
        })?;

    Ok(children(trenuri, TRAIN_ELEMENT).collect())
}

/// `Trasa` elements under `Tren/Trase`
pub fn route_elements<'a, 'i: 'a>(train: Node<'a, 'i>) -> impl Iterator<Item = Node<'a, 'i>> {
    children(train, "Trase").flat_map(|trase| children(trase, ROUTE_ELEMENT))
}

/// `ElementTrasa` elements directly under a `Trasa`
pub fn segment_elements<'a, 'i: 'a>(route: Node<'a, 'i>) -> impl Iterator<Item = Node<'a, 'i>> {
    children(route, SEGMENT_ELEMENT)
}

fn required<'a>(node: Node<'a, '_>, attribute: &'static str) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| ImportError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute,
        })
}

fn required_string(node: Node<'_, '_>, attribute: &'static str) -> Result<String> {
    required(node, attribute).map(str::to_string)
}

// ============================================================================
// NATURAL KEYS
// ============================================================================

pub fn train_number_of(train: Node<'_, '_>) -> Result<i64> {
    train_number_from_str(required(train, "Numar")?)
}

pub fn route_id_of(route: Node<'_, '_>) -> Result<i64> {
    parse_int("Id", required(route, "Id")?)
}

pub fn sequence_of(segment: Node<'_, '_>) -> Result<i64> {
    parse_int("Secventa", required(segment, "Secventa")?)
}

// ============================================================================
// ROW READERS
// ============================================================================

/// Read every `Tren` attribute; nothing is returned unless all are present
pub fn read_train(node: Node<'_, '_>, number: i64, company_id: i64) -> Result<Train> {
    Ok(Train {
        number,
        company_id,
        category: required_string(node, "CategorieTren")?,
        cumulative_km: required_string(node, "KmCum")?,
        length: required_string(node, "Lungime")?,
        raw_number: required_string(node, "Numar")?,
        operator: required_string(node, "Operator")?,
        owner: required_string(node, "Proprietar")?,
        power: required_string(node, "Putere")?,
        rank: required_string(node, "Rang")?,
        services: required_string(node, "Servicii")?,
        tonnage: required_string(node, "Tonaj")?,
    })
}

pub fn read_route(node: Node<'_, '_>, train_number: i64, route_id: i64) -> Result<Route> {
    Ok(Route {
        train_number,
        id: route_id,
        kind: required_string(node, "Tip")?,
        origin_code: required_string(node, "CodStatieInitiala")?,
        destination_code: required_string(node, "CodStatieFinala")?,
    })
}

pub fn read_segment(
    node: Node<'_, '_>,
    train_number: i64,
    route_id: i64,
    sequence: i64,
) -> Result<RouteSegment> {
    Ok(RouteSegment {
        train_number,
        route_id,
        sequence,
        adjustments: required_string(node, "Ajustari")?,
        destination_code: required_string(node, "CodStaDest")?,
        origin_code: required_string(node, "CodStaOrigine")?,
        destination_name: required_string(node, "DenStaDestinatie")?,
        origin_name: required_string(node, "DenStaOrigine")?,
        km: required_string(node, "Km")?,
        length: required_string(node, "Lungime")?,
        departure: required_string(node, "OraP")?,
        arrival: required_string(node, "OraS")?,
        rci: required_string(node, "Rci")?,
        rco: required_string(node, "Rco")?,
        restriction: required_string(node, "Restrictie")?,
        dwell_seconds: required_string(node, "StationareSecunde")?,
        stop_type: required_string(node, "TipOprire")?,
        tonnage: required_string(node, "Tonaj")?,
        timetable_speed: required_string(node, "VitezaLivret")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<XmlIf>
  <XmlMts>
    <Mt>
      <Trenuri>
        <Tren Numar="1651-1" CategorieTren="R" KmCum="120" Lungime="200" Operator="OP" Proprietar="PR" Putere="P" Rang="1" Servicii="S" Tonaj="300">
          <Trase>
            <Trasa Id="7" Tip="A" CodStatieInitiala="10" CodStatieFinala="20">
              <ElementTrasa Secventa="1" Ajustari="" CodStaDest="20" CodStaOrigine="10" DenStaDestinatie="B" DenStaOrigine="A" Km="5" Lungime="200" OraP="100" OraS="90" Rci="" Rco="" Restrictie="" StationareSecunde="60" TipOprire="C" Tonaj="300" VitezaLivret="80"/>
              <ElementTrasa Secventa="2" CodStaOrigine="20"/>
            </Trasa>
          </Trase>
        </Tren>
        <Tren Numar="X9"/>
      </Trenuri>
    </Mt>
  </XmlMts>
</XmlIf>"#;

    #[test]
    fn test_train_number_examples() {
        assert_eq!(train_number_from_str("501X").unwrap(), 501);
        assert_eq!(train_number_from_str("12-34").unwrap(), 12);
        assert_eq!(train_number_from_str("007").unwrap(), 7);
        assert!(matches!(
            train_number_from_str("X501"),
            Err(ImportError::NumberFormat { .. })
        ));
        assert!(train_number_from_str("").is_err());
        assert!(train_number_from_str(" 501").is_err());
    }

    #[test]
    fn test_station_code() {
        assert_eq!(station_code("1000"), Some(1000));
        assert_eq!(station_code("N/A"), None);
        assert_eq!(station_code(""), None);
        assert_eq!(station_code("12a"), None);
        assert_eq!(station_code("-5"), None);
    }

    #[test]
    fn test_walks_wrapped_document() {
        let path = Path::new("sample.xml");
        let doc = parse_timetable(path, SAMPLE).unwrap();
        let trains = train_elements(path, &doc).unwrap();
        assert_eq!(trains.len(), 2);

        let number = train_number_of(trains[0]).unwrap();
        assert_eq!(number, 1651);

        let train = read_train(trains[0], number, 3).unwrap();
        assert_eq!(train.raw_number, "1651-1");
        assert_eq!(train.company_id, 3);
        assert_eq!(train.tonnage, "300");

        let routes: Vec<_> = route_elements(trains[0]).collect();
        assert_eq!(routes.len(), 1);
        let route_id = route_id_of(routes[0]).unwrap();
        assert_eq!(route_id, 7);

        let segments: Vec<_> = segment_elements(routes[0]).collect();
        assert_eq!(segments.len(), 2);
        let segment = read_segment(segments[0], number, route_id, 1).unwrap();
        assert_eq!(segment.origin_name, "A");
        assert_eq!(segment.destination_code, "20");
    }

    #[test]
    fn test_missing_attribute_is_reported() {
        let path = Path::new("sample.xml");
        let doc = parse_timetable(path, SAMPLE).unwrap();
        let trains = train_elements(path, &doc).unwrap();

        // Second train only carries a non-numeric Numar
        assert!(matches!(
            train_number_of(trains[1]),
            Err(ImportError::NumberFormat { .. })
        ));
        match read_train(trains[1], 9, 1) {
            Err(ImportError::MissingAttribute { element, attribute }) => {
                assert_eq!(element, "Tren");
                assert_eq!(attribute, "CategorieTren");
            }
            other => panic!("expected missing attribute, got {:?}", other),
        }

        let route = route_elements(trains[0]).next().unwrap();
        let short = segment_elements(route).nth(1).unwrap();
        assert_eq!(sequence_of(short).unwrap(), 2);
        assert!(matches!(
            read_segment(short, 1651, 7, 2),
            Err(ImportError::MissingAttribute { attribute: "Ajustari", .. })
        ));
    }

    #[test]
    fn test_root_without_trains_container() {
        let path = Path::new("empty.xml");
        let doc = parse_timetable(path, "<XmlMts><Mt/></XmlMts>").unwrap();
        assert!(matches!(
            train_elements(path, &doc),
            Err(ImportError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let path = Path::new("broken.xml");
        assert!(matches!(
            parse_timetable(path, "<XmlMts><Mt>"),
            Err(ImportError::Xml { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_leading_digits_become_the_key(n in 0u32..10_000_000, suffix in "[A-Za-z/ -][A-Za-z0-9/ -]{0,8}") {
            let s = format!("{}{}", n, suffix);
            prop_assert_eq!(train_number_from_str(&s).unwrap(), i64::from(n));
        }

        #[test]
        fn prop_non_digit_prefix_fails(s in "[A-Za-z/ -][A-Za-z0-9]{0,8}") {
            prop_assert!(train_number_from_str(&s).is_err());
        }
    }
}
