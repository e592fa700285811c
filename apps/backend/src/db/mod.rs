//! PostgreSQL database operations

use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with a generated token and default preferences
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<User> {
        let token = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token, username, email, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, token, username, email, first_name, last_name,
                      is_active, created_at, updated_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(username)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut *tx)
        .await?;

        for (key, value) in DEFAULT_PREFERENCES {
            sqlx::query(
                r#"
                INSERT INTO user_preferences (user_id, preference_key, preference_value)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(user.id)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(user)
    }

    /// Check whether a username or email is already registered
    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE username = $1 OR email = $2
            ) AS taken
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("taken"))
    }

    /// Get an active user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, username, email, first_name, last_name,
                   is_active, created_at, updated_at, last_seen_at
            FROM users
            WHERE token = $1 AND is_active
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, username, email, first_name, last_name,
                   is_active, created_at, updated_at, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update the last_seen_at timestamp
    pub async fn touch_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check whether an email belongs to a different user
    pub async fn email_in_use_by_other(&self, email: &str, user_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE email = $1 AND id != $2
            ) AS taken
            "#,
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("taken"))
    }

    /// Write the profile fields of a user row back
    pub async fn update_profile(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, email = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Soft delete a user account; its token stops resolving
    pub async fn deactivate_user(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get all preferences for a user
    pub async fn get_preferences(&self, user_id: Uuid) -> Result<Vec<(String, String)>> {
        let prefs = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT preference_key, preference_value
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(prefs)
    }

    /// Upsert a single preference
    pub async fn upsert_preference(&self, user_id: Uuid, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, preference_key, preference_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, preference_key) DO UPDATE SET
                preference_value = EXCLUDED.preference_value,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Piece Repository ===

    /// Get all pieces for a user, newest created first
    pub async fn list_pieces(&self, user_id: Uuid) -> Result<Vec<DbPiece>> {
        let pieces = sqlx::query_as::<_, DbPiece>(
            r#"
            SELECT id, user_id, name, composer, work_classification, source,
                   status, play_counter, last_played_date, created_at, updated_at
            FROM pieces
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pieces)
    }

    /// Get a piece owned by the user
    pub async fn get_piece(&self, user_id: Uuid, piece_id: i64) -> Result<Option<DbPiece>> {
        let piece = sqlx::query_as::<_, DbPiece>(
            r#"
            SELECT id, user_id, name, composer, work_classification, source,
                   status, play_counter, last_played_date, created_at, updated_at
            FROM pieces
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(piece_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(piece)
    }

    /// Insert a new piece
    #[allow(clippy::too_many_arguments)]
    pub async fn create_piece(
        &self,
        user_id: Uuid,
        name: &str,
        composer: &str,
        work_classification: Option<&str>,
        source: Option<&str>,
        status: &str,
        play_counter: i32,
    ) -> Result<DbPiece> {
        let piece = sqlx::query_as::<_, DbPiece>(
            r#"
            INSERT INTO pieces (user_id, name, composer, work_classification, source, status, play_counter)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, name, composer, work_classification, source,
                      status, play_counter, last_played_date, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(composer)
        .bind(work_classification)
        .bind(source)
        .bind(status)
        .bind(play_counter)
        .fetch_one(&self.pool)
        .await?;

        Ok(piece)
    }

    /// Write the mutable fields of a piece row back
    pub async fn update_piece(&self, piece: &DbPiece) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE pieces
            SET name = $3, composer = $4, work_classification = $5, source = $6,
                status = $7, play_counter = $8, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(piece.id)
        .bind(piece.user_id)
        .bind(&piece.name)
        .bind(&piece.composer)
        .bind(&piece.work_classification)
        .bind(&piece.source)
        .bind(&piece.status)
        .bind(piece.play_counter)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a piece; join rows cascade
    pub async fn delete_piece(&self, user_id: Uuid, piece_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM pieces
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(piece_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get pieces with a given status, least recently played first
    pub async fn list_pieces_by_status(&self, user_id: Uuid, status: &str) -> Result<Vec<DbPiece>> {
        let pieces = sqlx::query_as::<_, DbPiece>(
            r#"
            SELECT id, user_id, name, composer, work_classification, source,
                   status, play_counter, last_played_date, created_at, updated_at
            FROM pieces
            WHERE user_id = $1 AND status = $2
            ORDER BY last_played_date ASC NULLS FIRST
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(pieces)
    }

    /// Increment the play counter and stamp the last played date
    pub async fn mark_piece_played(&self, user_id: Uuid, piece_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE pieces
            SET play_counter = play_counter + 1,
                last_played_date = CURRENT_DATE,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(piece_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Exercise Repository ===

    /// Get all exercises for a user, newest created first
    pub async fn list_exercises(&self, user_id: Uuid) -> Result<Vec<DbExercise>> {
        let exercises = sqlx::query_as::<_, DbExercise>(
            r#"
            SELECT id, user_id, name, description, last_practiced_date, created_at, updated_at
            FROM exercises
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    /// Get an exercise owned by the user
    pub async fn get_exercise(&self, user_id: Uuid, exercise_id: i64) -> Result<Option<DbExercise>> {
        let exercise = sqlx::query_as::<_, DbExercise>(
            r#"
            SELECT id, user_id, name, description, last_practiced_date, created_at, updated_at
            FROM exercises
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(exercise_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exercise)
    }

    /// Insert a new exercise
    pub async fn create_exercise(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<DbExercise> {
        let exercise = sqlx::query_as::<_, DbExercise>(
            r#"
            INSERT INTO exercises (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, last_practiced_date, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(exercise)
    }

    /// Write the mutable fields of an exercise row back
    pub async fn update_exercise(&self, exercise: &DbExercise) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exercises
            SET name = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(exercise.id)
        .bind(exercise.user_id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete an exercise; join rows cascade
    pub async fn delete_exercise(&self, user_id: Uuid, exercise_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM exercises
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(exercise_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stamp the last practiced date
    pub async fn mark_exercise_practiced(&self, user_id: Uuid, exercise_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exercises
            SET last_practiced_date = CURRENT_DATE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(exercise_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Session Repository ===

    /// Get sessions for a user with optional date/status filters
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        status: Option<&str>,
    ) -> Result<Vec<DbSession>> {
        let sessions = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, session_date, duration, status, notes,
                   completed_at, created_at, updated_at
            FROM practice_sessions
            WHERE user_id = $1
              AND ($2::DATE IS NULL OR session_date >= $2)
              AND ($3::DATE IS NULL OR session_date <= $3)
              AND ($4::TEXT IS NULL OR status = $4)
            ORDER BY session_date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Get a session owned by the user
    pub async fn get_session(&self, user_id: Uuid, session_id: i64) -> Result<Option<DbSession>> {
        let session = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, session_date, duration, status, notes,
                   completed_at, created_at, updated_at
            FROM practice_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Piece join rows for a set of sessions
    pub async fn session_pieces_for(&self, session_ids: &[i64]) -> Result<Vec<SessionPieceRow>> {
        let rows = sqlx::query_as::<_, SessionPieceRow>(
            r#"
            SELECT sp.session_id, sp.piece_id, p.name, p.composer,
                   sp.duration_minutes, sp.notes
            FROM session_pieces sp
            JOIN pieces p ON sp.piece_id = p.id
            WHERE sp.session_id = ANY($1)
            ORDER BY sp.id
            "#,
        )
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Exercise join rows for a set of sessions
    pub async fn session_exercises_for(
        &self,
        session_ids: &[i64],
    ) -> Result<Vec<SessionExerciseRow>> {
        let rows = sqlx::query_as::<_, SessionExerciseRow>(
            r#"
            SELECT se.session_id, se.exercise_id, e.name,
                   se.duration_minutes, se.notes
            FROM session_exercises se
            JOIN exercises e ON se.exercise_id = e.id
            WHERE se.session_id = ANY($1)
            ORDER BY se.id
            "#,
        )
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a session and its piece/exercise join rows in one transaction
    #[allow(clippy::too_many_arguments)]
    pub async fn create_session(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        duration: i32,
        status: &str,
        notes: Option<&str>,
        pieces: &[SessionItemInput],
        exercises: &[SessionItemInput],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO practice_sessions (user_id, session_date, duration, status, notes, completed_at)
            VALUES ($1, $2, $3, $4, $5, CASE WHEN $4 = 'Completed' THEN NOW() END)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(duration)
        .bind(status)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;
        let session_id: i64 = row.get("id");

        for piece in pieces {
            sqlx::query(
                r#"
                INSERT INTO session_pieces (session_id, piece_id, duration_minutes, notes)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(session_id)
            .bind(piece.id)
            .bind(piece.duration_minutes.unwrap_or(0))
            .bind(&piece.notes)
            .execute(&mut *tx)
            .await?;
        }

        for exercise in exercises {
            sqlx::query(
                r#"
                INSERT INTO session_exercises (session_id, exercise_id, duration_minutes, notes)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(session_id)
            .bind(exercise.id)
            .bind(exercise.duration_minutes.unwrap_or(0))
            .bind(&exercise.notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(session_id)
    }

    /// Write the mutable fields of a session row back
    pub async fn update_session(&self, session: &DbSession) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE practice_sessions
            SET session_date = $3, duration = $4, status = $5, notes = $6,
                completed_at = $7, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.session_date)
        .bind(session.duration)
        .bind(&session.status)
        .bind(&session.notes)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a session; join rows cascade
    pub async fn delete_session(&self, user_id: Uuid, session_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM practice_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sessions within a date range with join counts
    pub async fn sessions_in_range(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SessionRangeRow>> {
        let rows = sqlx::query_as::<_, SessionRangeRow>(
            r#"
            SELECT s.id, s.session_date, s.duration, s.status, s.notes,
                   COUNT(DISTINCT sp.piece_id) AS piece_count,
                   COUNT(DISTINCT se.exercise_id) AS exercise_count,
                   s.created_at, s.updated_at, s.completed_at
            FROM practice_sessions s
            LEFT JOIN session_pieces sp ON s.id = sp.session_id
            LEFT JOIN session_exercises se ON s.id = se.session_id
            WHERE s.user_id = $1 AND s.session_date >= $2 AND s.session_date <= $3
            GROUP BY s.id
            ORDER BY s.session_date DESC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Count the piece and exercise join rows of a session
    pub async fn count_session_items(&self, session_id: i64) -> Result<(i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM session_pieces WHERE session_id = $1) AS piece_count,
                (SELECT COUNT(*) FROM session_exercises WHERE session_id = $1) AS exercise_count
            "#,
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((row.get("piece_count"), row.get("exercise_count")))
    }

    // === Statistics Repository ===

    /// Additive per-day aggregate written whenever a session becomes Completed.
    /// Never decremented on later edits or deletes.
    pub async fn record_completion(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        duration: i32,
        pieces_practiced: i32,
        exercises_practiced: i32,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO practice_statistics
                (user_id, stat_date, total_minutes, session_count, pieces_practiced, exercises_practiced)
            VALUES ($1, $2, $3, 1, $4, $5)
            ON CONFLICT (user_id, stat_date) DO UPDATE SET
                total_minutes = practice_statistics.total_minutes + EXCLUDED.total_minutes,
                session_count = practice_statistics.session_count + 1,
                pieces_practiced = practice_statistics.pieces_practiced + EXCLUDED.pieces_practiced,
                exercises_practiced = practice_statistics.exercises_practiced + EXCLUDED.exercises_practiced
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(duration)
        .bind(pieces_practiced)
        .bind(exercises_practiced)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Dashboard rollup; every count zero-filled when no rows exist
    pub async fn dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats> {
        let piece_row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_pieces,
                COUNT(CASE WHEN status = 'In Training' THEN 1 END) AS training_pieces,
                COUNT(CASE WHEN status = 'Repertoire' THEN 1 END) AS repertoire_pieces
            FROM pieces
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let session_row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_sessions,
                COUNT(CASE WHEN status = 'Completed' THEN 1 END) AS completed_sessions,
                COALESCE(SUM(CASE WHEN status = 'Completed' THEN duration END), 0)::BIGINT
                    AS total_practice_minutes
            FROM practice_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_exercises: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_pieces: piece_row.get("total_pieces"),
            training_pieces: piece_row.get("training_pieces"),
            repertoire_pieces: piece_row.get("repertoire_pieces"),
            total_sessions: session_row.get("total_sessions"),
            completed_sessions: session_row.get("completed_sessions"),
            total_practice_minutes: session_row.get("total_practice_minutes"),
            total_exercises,
        })
    }

    /// Per-day completed-practice totals within the last `days` days.
    /// Days without completed sessions are absent (sparse result).
    pub async fn practice_by_day(&self, user_id: Uuid, days: i32) -> Result<Vec<DailyPracticeRow>> {
        let rows = sqlx::query_as::<_, DailyPracticeRow>(
            r#"
            SELECT session_date AS date,
                   SUM(duration)::BIGINT AS total_minutes,
                   COUNT(*) AS session_count
            FROM practice_sessions
            WHERE user_id = $1
              AND status = 'Completed'
              AND session_date >= CURRENT_DATE - $2
            GROUP BY session_date
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-piece completed-session counts and practice minutes
    pub async fn piece_stats(&self, user_id: Uuid) -> Result<Vec<PieceStatsRow>> {
        let rows = sqlx::query_as::<_, PieceStatsRow>(
            r#"
            SELECT p.id, p.name, p.composer, p.status, p.play_counter, p.last_played_date,
                   COUNT(s.id) AS session_count,
                   COALESCE(SUM(sp.duration_minutes) FILTER (WHERE s.id IS NOT NULL), 0)::BIGINT
                       AS total_practice_minutes
            FROM pieces p
            LEFT JOIN session_pieces sp ON p.id = sp.piece_id
            LEFT JOIN practice_sessions s ON sp.session_id = s.id AND s.status = 'Completed'
            WHERE p.user_id = $1
            GROUP BY p.id
            ORDER BY p.play_counter DESC, p.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-exercise completed-session counts and practice minutes
    pub async fn exercise_stats(&self, user_id: Uuid) -> Result<Vec<ExerciseStatsRow>> {
        let rows = sqlx::query_as::<_, ExerciseStatsRow>(
            r#"
            SELECT e.id, e.name, e.last_practiced_date,
                   COUNT(s.id) AS session_count,
                   COALESCE(SUM(se.duration_minutes) FILTER (WHERE s.id IS NOT NULL), 0)::BIGINT
                       AS total_practice_minutes
            FROM exercises e
            LEFT JOIN session_exercises se ON e.id = se.exercise_id
            LEFT JOIN practice_sessions s ON se.session_id = s.id AND s.status = 'Completed'
            WHERE e.user_id = $1
            GROUP BY e.id
            ORDER BY e.last_practiced_date DESC NULLS LAST, e.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-day rows of a month of completed practice, ascending by date.
    /// Distinct piece/exercise counts are aggregated separately so session
    /// durations are never multiplied by join-row fan-out.
    pub async fn monthly_daily_stats(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<Vec<MonthlyDailyRow>> {
        let rows = sqlx::query_as::<_, MonthlyDailyRow>(
            r#"
            SELECT d.date,
                   d.total_minutes,
                   d.session_count,
                   COALESCE(p.cnt, 0) AS unique_pieces_practiced,
                   COALESCE(e.cnt, 0) AS unique_exercises_practiced
            FROM (
                SELECT s.session_date AS date,
                       SUM(s.duration)::BIGINT AS total_minutes,
                       COUNT(*) AS session_count
                FROM practice_sessions s
                WHERE s.user_id = $1
                  AND s.status = 'Completed'
                  AND EXTRACT(YEAR FROM s.session_date) = $2
                  AND EXTRACT(MONTH FROM s.session_date) = $3
                GROUP BY s.session_date
            ) d
            LEFT JOIN (
                SELECT s.session_date AS date, COUNT(DISTINCT sp.piece_id) AS cnt
                FROM practice_sessions s
                JOIN session_pieces sp ON sp.session_id = s.id
                WHERE s.user_id = $1
                  AND s.status = 'Completed'
                  AND EXTRACT(YEAR FROM s.session_date) = $2
                  AND EXTRACT(MONTH FROM s.session_date) = $3
                GROUP BY s.session_date
            ) p ON p.date = d.date
            LEFT JOIN (
                SELECT s.session_date AS date, COUNT(DISTINCT se.exercise_id) AS cnt
                FROM practice_sessions s
                JOIN session_exercises se ON se.session_id = s.id
                WHERE s.user_id = $1
                  AND s.status = 'Completed'
                  AND EXTRACT(YEAR FROM s.session_date) = $2
                  AND EXTRACT(MONTH FROM s.session_date) = $3
                GROUP BY s.session_date
            ) e ON e.date = d.date
            ORDER BY d.date ASC
            "#,
        )
        .bind(user_id)
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The 100 most recent distinct days with completed practice,
    /// most recent first. The cap bounds the streak computation; a streak
    /// longer than the window under-reports longest_streak.
    pub async fn recent_practice_days(&self, user_id: Uuid) -> Result<Vec<PracticeDayRow>> {
        let rows = sqlx::query_as::<_, PracticeDayRow>(
            r#"
            SELECT session_date AS practice_date,
                   SUM(duration)::BIGINT AS total_minutes
            FROM practice_sessions
            WHERE user_id = $1 AND status = 'Completed'
            GROUP BY session_date
            ORDER BY practice_date DESC
            LIMIT 100
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // === Activity & Profile Summary ===

    /// Per-day counts of created pieces/exercises/sessions, newest first
    pub async fn activity(&self, user_id: Uuid, days: i32) -> Result<Vec<ActivityRow>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT date,
                   COALESCE(SUM(CASE WHEN kind = 'piece' THEN cnt END), 0)::BIGINT AS pieces,
                   COALESCE(SUM(CASE WHEN kind = 'exercise' THEN cnt END), 0)::BIGINT AS exercises,
                   COALESCE(SUM(CASE WHEN kind = 'session' THEN cnt END), 0)::BIGINT AS sessions
            FROM (
                SELECT created_at::DATE AS date, 'piece' AS kind, COUNT(*) AS cnt
                FROM pieces
                WHERE user_id = $1 AND created_at::DATE >= CURRENT_DATE - $2
                GROUP BY created_at::DATE

                UNION ALL

                SELECT created_at::DATE AS date, 'exercise' AS kind, COUNT(*) AS cnt
                FROM exercises
                WHERE user_id = $1 AND created_at::DATE >= CURRENT_DATE - $2
                GROUP BY created_at::DATE

                UNION ALL

                SELECT session_date AS date, 'session' AS kind, COUNT(*) AS cnt
                FROM practice_sessions
                WHERE user_id = $1 AND session_date >= CURRENT_DATE - $2
                GROUP BY session_date
            ) activity
            GROUP BY date
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Profile summary totals
    pub async fn profile_summary_stats(&self, user_id: Uuid) -> Result<ProfileSummaryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM pieces WHERE user_id = $1) AS total_pieces,
                (SELECT COUNT(*) FROM exercises WHERE user_id = $1) AS total_exercises,
                (SELECT COUNT(*) FROM practice_sessions WHERE user_id = $1) AS total_sessions,
                (SELECT COALESCE(SUM(duration), 0)::BIGINT FROM practice_sessions
                 WHERE user_id = $1 AND status = 'Completed') AS total_practice_minutes,
                (SELECT COUNT(*) FROM practice_sessions
                 WHERE user_id = $1 AND session_date >= CURRENT_DATE - 7) AS recent_sessions
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProfileSummaryStats {
            total_pieces: row.get("total_pieces"),
            total_exercises: row.get("total_exercises"),
            total_sessions: row.get("total_sessions"),
            total_practice_minutes: row.get("total_practice_minutes"),
            recent_sessions: row.get("recent_sessions"),
        })
    }
}

/// Preferences seeded at registration
const DEFAULT_PREFERENCES: [(&str, &str); 6] = [
    ("theme", "light"),
    ("language", "en"),
    ("default_session_duration", "60"),
    ("week_starts_on", "monday"),
    ("show_completed_sessions", "true"),
    ("auto_save", "true"),
];
