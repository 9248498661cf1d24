use serde::{Deserialize, Serialize};

use super::BookId;

/// 書籍 - カタログの1タイトル
///
/// 1タイトルにつき1冊のみ管理する（複数冊の在庫管理はしない）。
///
/// `is_available` は台帳の「未返却の貸出」から導出される値のキャッシュ。
/// 書き込むのは貸出エンジンだけで、取引ごとに台帳と一致させる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub is_available: bool,
}

impl Book {
    /// タイトル・著者・ISBNのいずれかに部分一致するか（大文字小文字は区別しない）
    ///
    /// `needle` は小文字化済みであること。
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.isbn.to_lowercase().contains(needle)
    }
}

/// カタログ登録用の書籍データ（IDはストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            description: String::new(),
            cover_image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    /// IDを割り当てて書籍にする。新規登録の書籍は常に貸出可能。
    pub fn into_book(self, book_id: BookId) -> Book {
        Book {
            book_id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            description: self.description,
            cover_image: self.cover_image,
            is_available: true,
        }
    }
}
