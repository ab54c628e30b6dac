//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{author::Author, book_instance::BookInstance, genre::Genre};

/// Book record (bibliographic data, independent of its copies)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
}

/// Book with author, genres and physical copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

/// Create / update book request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Summary is limited to 1000 characters"))]
    pub summary: String,
    /// 13 character ISBN
    #[validate(length(equal = 13, message = "ISBN must be 13 characters"))]
    pub isbn: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

impl BookForm {
    /// Run derived validation plus the ISBN character check
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !self.isbn.chars().all(|c| c.is_ascii_digit()) {
            let mut error = ValidationError::new("isbn_characters");
            error.message = Some("ISBN may only contain digits".into());
            errors.add("isbn", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(isbn: &str) -> BookForm {
        BookForm {
            title: "Dune".to_string(),
            author_id: Some(1),
            summary: String::new(),
            isbn: isbn.to_string(),
            genre_ids: vec![],
        }
    }

    #[test]
    fn test_valid_isbn() {
        assert!(form("9780441013593").check().is_ok());
    }

    #[test]
    fn test_isbn_length() {
        let errors = form("978044101359").check().unwrap_err();
        assert!(errors.field_errors().contains_key("isbn"));
    }

    #[test]
    fn test_isbn_characters() {
        let errors = form("97804410135-3").check().unwrap_err();
        let isbn = &errors.field_errors()["isbn"];
        assert!(isbn.iter().any(|e| e.code == "isbn_characters"));
    }

    #[test]
    fn test_missing_summary_defaults_to_empty() {
        let parsed: BookForm =
            serde_json::from_str(r#"{"title":"Dune","isbn":"9780441013593"}"#).unwrap();
        assert_eq!(parsed.summary, "");
        assert!(parsed.genre_ids.is_empty());
        assert_eq!(parsed.author_id, None);
    }
}
