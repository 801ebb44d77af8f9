//! Solidity event declaration parser.
//!
//! Accepts the human-written form `event Name(type [indexed] [name], ...)`
//! and produces the ordered parameter list plus the canonical signature.
//! Types are taken verbatim: an unknown type only fails later, when the
//! decoder resolves it.

use logproof_core::{EventParam, EventSignature, ParseError};

const KEYWORD: &str = "event";
const INDEXED: &str = "indexed";

/// Parse an event declaration.
///
/// The first `event <Name>(...)` occurrence in `input` is used; the parameter
/// list runs to the first closing parenthesis.
pub fn parse_event_declaration(input: &str) -> Result<EventSignature, ParseError> {
    let (name, raw_params) = locate(input).ok_or_else(|| ParseError::InvalidDeclaration {
        input: input.to_string(),
    })?;

    if raw_params.trim().is_empty() {
        return Ok(EventSignature {
            name: name.to_string(),
            params: Vec::new(),
        });
    }

    let params = raw_params
        .split(',')
        .enumerate()
        .map(|(position, raw)| parse_param(position, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EventSignature {
        name: name.to_string(),
        params,
    })
}

/// Find `event\s+(\w+)\s*\(([^)]*)\)` and return the name and raw parameter text.
fn locate(input: &str) -> Option<(&str, &str)> {
    for (start, _) in input.match_indices(KEYWORD) {
        let rest = &input[start + KEYWORD.len()..];
        let after_ws = rest.trim_start();
        if after_ws.len() == rest.len() {
            continue;
        }

        let name_len = after_ws
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after_ws.len());
        if name_len == 0 {
            continue;
        }
        let name = &after_ws[..name_len];

        let Some(body) = after_ws[name_len..].trim_start().strip_prefix('(') else {
            continue;
        };
        let Some(close) = body.find(')') else {
            continue;
        };
        return Some((name, &body[..close]));
    }
    None
}

fn parse_param(position: usize, raw: &str) -> Result<EventParam, ParseError> {
    let mut indexed = false;
    let mut words = raw.split_whitespace().filter(|w| {
        let qualifier = *w == INDEXED;
        indexed |= qualifier;
        !qualifier
    });

    let ty = words.next().ok_or(ParseError::EmptyParam { position })?;
    let name = words.next().unwrap_or_default();
    // Drain so a trailing `indexed` (`uint256 a indexed`) is still seen.
    words.for_each(drop);

    Ok(EventParam::new(ty, name, indexed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_declaration() {
        let sig = parse_event_declaration(
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        )
        .unwrap();
        assert_eq!(sig.name, "Transfer");
        assert_eq!(
            sig.params,
            vec![
                EventParam::new("address", "from", true),
                EventParam::new("address", "to", true),
                EventParam::new("uint256", "value", false),
            ]
        );
        assert_eq!(sig.canonical(), "Transfer(address,address,uint256)");
    }

    #[test]
    fn whitespace_insensitive() {
        let sig = parse_event_declaration(
            "  event   Deposit (  address   indexed user ,string memo,uint256  amount )  ;",
        )
        .unwrap();
        assert_eq!(sig.canonical(), "Deposit(address,string,uint256)");
        assert!(sig.params[0].indexed);
        assert_eq!(sig.params[1].name, "memo");
    }

    #[test]
    fn unnamed_params_are_legal() {
        let sig = parse_event_declaration("event Ping(uint64 indexed, bytes32)").unwrap();
        assert_eq!(sig.params[0], EventParam::new("uint64", "", true));
        assert_eq!(sig.params[1], EventParam::new("bytes32", "", false));
    }

    #[test]
    fn empty_parameter_list() {
        let sig = parse_event_declaration("event Reset()").unwrap();
        assert!(sig.params.is_empty());
        assert_eq!(sig.canonical(), "Reset()");
    }

    #[test]
    fn names_containing_indexed_are_not_qualifiers() {
        let sig = parse_event_declaration("event Count(uint256 indexedTotal)").unwrap();
        assert!(!sig.params[0].indexed);
        assert_eq!(sig.params[0].name, "indexedTotal");
    }

    #[test]
    fn invalid_declarations() {
        assert!(matches!(
            parse_event_declaration("function transfer(address,uint256)"),
            Err(ParseError::InvalidDeclaration { .. })
        ));
        assert!(parse_event_declaration("event (uint256 a)").is_err());
        assert!(parse_event_declaration("event Foo(uint256 a").is_err());
        assert!(matches!(
            parse_event_declaration("event Foo(uint256 a,)"),
            Err(ParseError::EmptyParam { position: 1 })
        ));
    }

    #[test]
    fn types_are_not_validated() {
        let sig = parse_event_declaration("event Odd(notatype x)").unwrap();
        assert_eq!(sig.canonical(), "Odd(notatype)");
    }
}
