//! Data models for Bookshelf

/// Declares a closed string enum stored as TEXT in PostgreSQL.
///
/// Generates `as_str`, `Display`, `FromStr` and the sqlx `Type`/`Encode`/`Decode`
/// impls, all driven by the same variant-to-text table.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

pub mod book;
pub mod borrow;
pub mod category;
pub mod comment;
pub mod notification;
pub mod operation_log;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookDetails};
pub use borrow::{BorrowRecord, BorrowStatus};
pub use category::BookCategory;
pub use comment::BookComment;
pub use notification::{NewNotification, Notification, NotificationType};
pub use operation_log::{NewOperationLog, OperationLog};
pub use reservation::{Reservation, ReservationStatus};
pub use user::{Role, User, UserClaims, UserStatus};

/// Offset pagination request, normalised from optional query parameters.
///
/// Missing or out-of-range values degrade to defaults instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub const DEFAULT_PER_PAGE: i64 = 10;
    pub const MAX_PER_PAGE: i64 = 100;
    /// Largest page whose offset fits in an `i64`
    pub const MAX_PAGE: i64 = i64::MAX / Self::MAX_PER_PAGE;

    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self::with_default(page, per_page, Self::DEFAULT_PER_PAGE)
    }

    pub fn with_default(page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1).min(Self::MAX_PAGE);
        let per_page = per_page
            .filter(|p| (1..=Self::MAX_PER_PAGE).contains(p))
            .unwrap_or(default_per_page);
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Number of pages needed for `total` rows
    pub fn pages(&self, total: i64) -> i64 {
        (total + self.per_page - 1) / self.per_page
    }
}

/// Clamp a `limit` query parameter (top-N endpoints)
pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.filter(|l| (1..=Page::MAX_PER_PAGE).contains(l)).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None);
        assert_eq!(page, Page { page: 1, per_page: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_huge_number_is_capped() {
        let page = Page::new(Some(i64::MAX), Some(10));
        assert_eq!(page.page, Page::MAX_PAGE);
        assert_eq!(page.offset(), (Page::MAX_PAGE - 1) * 10);

        let page = Page::new(Some(i64::MAX), Some(Page::MAX_PER_PAGE));
        assert!(page.offset() > 0);
    }

    #[test]
    fn test_page_invalid_values_degrade() {
        assert_eq!(Page::new(Some(0), Some(0)), Page { page: 1, per_page: 10 });
        assert_eq!(Page::new(Some(-3), Some(1000)), Page { page: 1, per_page: 10 });
        assert_eq!(Page::with_default(None, None, 20).per_page, 20);
    }

    #[test]
    fn test_page_offset_and_count() {
        let page = Page::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
        assert_eq!(page.pages(0), 0);
        assert_eq!(page.pages(20), 1);
        assert_eq!(page.pages(41), 3);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 10), 10);
        assert_eq!(clamp_limit(Some(5), 10), 5);
        assert_eq!(clamp_limit(Some(0), 10), 10);
        assert_eq!(clamp_limit(Some(500), 10), 10);
    }
}
