// ABOUTME: Password-reset OTP storage
// ABOUTME: Keeps at most one live code per email with an expiry timestamp

use super::Database;
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use sqlx::Row;

/// A stored password-reset code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    /// Email the code was sent to
    pub email: String,
    /// 4-digit code
    pub code: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Whether the code is past its expiry at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl Database {
    pub(super) async fn migrate_otps(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS password_reset_otps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                code TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_password_reset_otps_email ON password_reset_otps(email)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store `record`, dropping any earlier codes for the same email
    pub async fn replace_otp(&self, record: &OtpRecord) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_reset_otps WHERE email = $1")
            .bind(&record.email)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO password_reset_otps (email, code, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&record.email)
        .bind(&record.code)
        .bind(record.expires_at)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Look up a code issued to `email`
    pub async fn find_otp(&self, email: &str, code: &str) -> AppResult<Option<OtpRecord>> {
        let row = sqlx::query(
            r"
            SELECT email, code, expires_at FROM password_reset_otps
            WHERE email = $1 AND code = $2
            ORDER BY id DESC
            LIMIT 1
            ",
        )
        .bind(email)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> AppResult<OtpRecord> {
            Ok(OtpRecord {
                email: row.try_get("email")?,
                code: row.try_get("code")?,
                expires_at: row.try_get("expires_at")?,
            })
        })
        .transpose()
    }

    /// Delete every code issued to `email`
    pub async fn delete_otps(&self, email: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM password_reset_otps WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(code: &str) -> OtpRecord {
        OtpRecord {
            email: "cook@example.com".to_owned(),
            code: code.to_owned(),
            expires_at: Utc::now() + Duration::minutes(5),
        }
    }

    #[tokio::test]
    async fn test_new_code_replaces_old_one() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.replace_otp(&record("1111")).await.unwrap();
        db.replace_otp(&record("2222")).await.unwrap();

        assert!(db
            .find_otp("cook@example.com", "1111")
            .await
            .unwrap()
            .is_none());
        let live = db
            .find_otp("cook@example.com", "2222")
            .await
            .unwrap()
            .unwrap();
        assert!(!live.is_expired_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_delete_otps() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.replace_otp(&record("1234")).await.unwrap();
        assert_eq!(db.delete_otps("cook@example.com").await.unwrap(), 1);
        assert!(db
            .find_otp("cook@example.com", "1234")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_expiry_check() {
        let mut otp = record("1234");
        otp.expires_at = Utc::now() - Duration::seconds(1);
        assert!(otp.is_expired_at(Utc::now()));
    }
}
