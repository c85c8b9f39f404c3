//! Filter-building helpers shared by the catalog repositories.

use ::mongodb::bson::{Bson, Document, doc};
use uuid::Uuid;

/// Split free text into search tokens on whitespace and commas.
///
/// Empty fragments are dropped, so `"  para, 500 "` yields `["para", "500"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case-insensitive literal substring match on `field`.
///
/// The token is escaped, so user input never acts as a pattern.
pub fn regex_fragment(field: &str, token: &str) -> Document {
    doc! {
        field: {
            "$regex": regex::escape(token),
            "$options": "i",
        }
    }
}

/// Match documents where every token appears in at least one of `fields`.
///
/// Returns `None` when `text` has no tokens, so callers can skip the clause.
pub fn token_search(text: &str, fields: &[&str]) -> Option<Document> {
    let per_token: Vec<Document> = tokenize(text)
        .iter()
        .map(|token| {
            let alternatives: Vec<Document> = fields
                .iter()
                .map(|field| regex_fragment(field, token))
                .collect();
            doc! { "$or": alternatives }
        })
        .collect();

    match per_token.len() {
        0 => None,
        1 => per_token.into_iter().next(),
        _ => Some(doc! { "$and": per_token }),
    }
}

/// Stored representation of an entity id
pub fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Stored representation of a list of entity ids, for `$in` / `$nin`
pub fn uuid_array(ids: &[Uuid]) -> Bson {
    Bson::Array(ids.iter().map(uuid_bson).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_whitespace_and_commas() {
        assert_eq!(tokenize("para 500"), vec!["para", "500"]);
        assert_eq!(tokenize(" para,,500 ,mg "), vec!["para", "500", "mg"]);
        assert!(tokenize(" , ").is_empty());
    }

    #[test]
    fn test_regex_fragment_escapes_metacharacters() {
        let fragment = regex_fragment("name", "c++ (kids)");
        let inner = fragment.get_document("name").unwrap();
        assert_eq!(inner.get_str("$regex").unwrap(), r"c\+\+ \(kids\)");
        assert_eq!(inner.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_token_search_single_token_is_a_plain_or() {
        let filter = token_search("para", &["name", "sku"]).unwrap();
        let alternatives = filter.get_array("$or").unwrap();
        assert_eq!(alternatives.len(), 2);
        assert!(filter.get("$and").is_none());
    }

    #[test]
    fn test_token_search_ands_tokens_and_ors_fields() {
        let filter = token_search("para 500", &["name", "sku"]).unwrap();
        let tokens = filter.get_array("$and").unwrap();
        assert_eq!(tokens.len(), 2);

        for clause in tokens {
            let clause = clause.as_document().unwrap();
            let fields: Vec<&str> = clause
                .get_array("$or")
                .unwrap()
                .iter()
                .map(|alt| alt.as_document().unwrap().keys().next().unwrap().as_str())
                .collect();
            assert_eq!(fields, vec!["name", "sku"]);
        }
    }

    #[test]
    fn test_token_search_empty_text() {
        assert!(token_search("   ", &["name"]).is_none());
    }

    #[test]
    fn test_uuid_helpers_store_strings() {
        let id = Uuid::nil();
        assert_eq!(uuid_bson(&id), Bson::String(id.to_string()));
        assert_eq!(
            uuid_array(&[id]),
            Bson::Array(vec![Bson::String(id.to_string())])
        );
    }
}
