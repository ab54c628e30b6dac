//! Data models for LocalLib

pub mod author;
pub mod book;
pub mod book_instance;
pub mod dashboard;
pub mod enums;
pub mod genre;
pub mod pagination;
pub mod renewal;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorForm};
pub use book::{Book, BookDetail, BookForm};
pub use book_instance::{BookInstance, LoanedCopy};
pub use dashboard::Dashboard;
pub use enums::LoanStatus;
pub use genre::{Genre, GenreForm};
pub use pagination::{PageRequest, Paginated};
pub use user::{User, UserClaims};
