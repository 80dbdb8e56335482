//! SQLite configuration store.
//!
//! Implements the bot, strategy, and game-result ports on a Diesel pool.
//! Writes run in `BEGIN IMMEDIATE` transactions so concurrent writers wait on
//! the busy timeout instead of failing on a lock upgrade.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    timestamp, BotChanges, BotRow, GameResultRow, NewBotRow, NewGameResultRow, NewStrategyRow,
    StrategyChanges, StrategyRow,
};
use crate::adapter::outbound::sqlite::database::schema::{bots, game_results, strategies};
use crate::domain::{
    Bot, BotId, BotPatch, GameResult, NewBot, NewGameResult, NewStrategy, Resolution, Strategy,
    StrategyId, StrategyPatch,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{BotStore, GameResultStore, StrategyStore};

// Game types compare as exact, case-insensitive text, never as LIKE patterns.
diesel::define_sql_function!(fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text);
diesel::define_sql_function!(fn trim(x: diesel::sql_types::Text) -> diesel::sql_types::Text);

/// Row for `SELECT last_insert_rowid()`.
#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    #[diesel(column_name = "id")]
    id: i32,
}

fn last_insert_rowid(conn: &mut SqliteConnection) -> QueryResult<i32> {
    diesel::sql_query("SELECT last_insert_rowid() AS id")
        .get_result::<LastInsertRowId>(conn)
        .map(|row| row.id)
}

/// SQLite-backed configuration store.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn load_bot(conn: &mut SqliteConnection, id: i32) -> Result<Option<Bot>> {
        bots::table
            .filter(bots::id.eq(id))
            .select(BotRow::as_select())
            .first(conn)
            .optional()?
            .map(BotRow::into_domain)
            .transpose()
    }

    fn load_strategy(conn: &mut SqliteConnection, id: i32) -> Result<Option<Strategy>> {
        strategies::table
            .filter(strategies::id.eq(id))
            .select(StrategyRow::as_select())
            .first(conn)
            .optional()?
            .map(StrategyRow::into_domain)
            .transpose()
    }

    fn insert_result(conn: &mut SqliteConnection, row: &NewGameResultRow) -> Result<GameResult> {
        diesel::insert_into(game_results::table)
            .values(row)
            .execute(conn)?;
        let id = last_insert_rowid(conn)?;
        Self::load_result(conn, id)?.ok_or(Error::NotFound {
            entity: "game result",
            id,
        })
    }

    fn load_result(conn: &mut SqliteConnection, id: i32) -> Result<Option<GameResult>> {
        game_results::table
            .filter(game_results::id.eq(id))
            .select(GameResultRow::as_select())
            .first(conn)
            .optional()?
            .map(GameResultRow::into_domain)
            .transpose()
    }
}

#[async_trait]
impl BotStore for SqliteStore {
    async fn create_bot(&self, bot: NewBot) -> Result<Bot> {
        let mut conn = self.conn()?;
        let row = NewBotRow::from_domain(bot, Utc::now());
        conn.immediate_transaction(|conn| {
            diesel::insert_into(bots::table).values(&row).execute(conn)?;
            let id = last_insert_rowid(conn)?;
            Self::load_bot(conn, id)?.ok_or(Error::NotFound { entity: "bot", id })
        })
    }

    async fn get_bot(&self, id: BotId) -> Result<Option<Bot>> {
        let mut conn = self.conn()?;
        Self::load_bot(&mut conn, id.get())
    }

    async fn list_bots(&self) -> Result<Vec<Bot>> {
        let mut conn = self.conn()?;
        bots::table
            .order(bots::id.desc())
            .select(BotRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(BotRow::into_domain)
            .collect()
    }

    async fn update_bot(&self, id: BotId, patch: BotPatch) -> Result<Option<Bot>> {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let Some(mut bot) = Self::load_bot(conn, id.get())? else {
                return Ok(None);
            };
            patch.apply(&mut bot);
            diesel::update(bots::table.filter(bots::id.eq(id.get())))
                .set(&BotChanges::from(&bot))
                .execute(conn)?;
            Ok(Some(bot))
        })
    }

    async fn delete_bot(&self, id: BotId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = conn.immediate_transaction(|conn| -> Result<usize> {
            let owned = strategies::table
                .filter(strategies::bot_id.eq(id.get()))
                .select(strategies::id);
            diesel::delete(
                game_results::table
                    .filter(game_results::strategy_id.nullable().eq_any(owned)),
            )
            .execute(conn)?;
            diesel::delete(strategies::table.filter(strategies::bot_id.eq(id.get())))
                .execute(conn)?;
            Ok(diesel::delete(bots::table.filter(bots::id.eq(id.get()))).execute(conn)?)
        })?;
        debug!(bot_id = %id, deleted, "Bot delete");
        Ok(deleted > 0)
    }

    async fn latest_eligible_bot(&self, game_type: Option<&str>) -> Result<Option<Bot>> {
        let mut conn = self.conn()?;
        let mut query = bots::table
            .filter(bots::is_active.eq(true))
            .filter(bots::telegram_token.is_not_null())
            .filter(bots::telegram_chat_id.is_not_null())
            .order(bots::id.desc())
            .select(BotRow::as_select())
            .into_boxed();
        if let Some(game_type) = game_type {
            let wanted = game_type.trim().to_ascii_lowercase();
            query = query.filter(lower(trim(bots::game_type)).eq(wanted));
        }

        // Blank credentials pass the SQL filter; the domain check has the last word.
        for row in query.load(&mut conn)? {
            let bot = row.into_domain()?;
            if bot.is_eligible() {
                return Ok(Some(bot));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl StrategyStore for SqliteStore {
    async fn create_strategy(&self, strategy: NewStrategy) -> Result<Strategy> {
        let mut conn = self.conn()?;
        let bot_id = strategy.bot_id.get();
        let row = NewStrategyRow::from_domain(strategy, Utc::now())?;
        conn.immediate_transaction(|conn| {
            if Self::load_bot(conn, bot_id)?.is_none() {
                return Err(Error::NotFound {
                    entity: "bot",
                    id: bot_id,
                });
            }
            diesel::insert_into(strategies::table)
                .values(&row)
                .execute(conn)?;
            let id = last_insert_rowid(conn)?;
            Self::load_strategy(conn, id)?.ok_or(Error::NotFound {
                entity: "strategy",
                id,
            })
        })
    }

    async fn get_strategy(&self, id: StrategyId) -> Result<Option<Strategy>> {
        let mut conn = self.conn()?;
        Self::load_strategy(&mut conn, id.get())
    }

    async fn list_strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>> {
        let mut conn = self.conn()?;
        strategies::table
            .filter(strategies::bot_id.eq(bot_id.get()))
            .order(strategies::id.desc())
            .select(StrategyRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(StrategyRow::into_domain)
            .collect()
    }

    async fn active_strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>> {
        let mut conn = self.conn()?;
        strategies::table
            .filter(strategies::bot_id.eq(bot_id.get()))
            .filter(strategies::is_active.eq(true))
            .order(strategies::id.asc())
            .select(StrategyRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(StrategyRow::into_domain)
            .collect()
    }

    async fn update_strategy(
        &self,
        id: StrategyId,
        patch: StrategyPatch,
    ) -> Result<Option<Strategy>> {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let Some(mut strategy) = Self::load_strategy(conn, id.get())? else {
                return Ok(None);
            };
            patch.apply(&mut strategy);
            let changes = StrategyChanges::from_domain(&strategy, Utc::now())?;
            diesel::update(strategies::table.filter(strategies::id.eq(id.get())))
                .set(&changes)
                .execute(conn)?;
            Self::load_strategy(conn, id.get())
        })
    }

    async fn delete_strategy(&self, id: StrategyId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = conn.immediate_transaction(|conn| -> Result<usize> {
            diesel::delete(game_results::table.filter(game_results::strategy_id.eq(id.get())))
                .execute(conn)?;
            Ok(diesel::delete(strategies::table.filter(strategies::id.eq(id.get())))
                .execute(conn)?)
        })?;
        Ok(deleted > 0)
    }

    async fn reset_counters(&self, id: StrategyId) -> Result<Option<Strategy>> {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let updated = diesel::update(strategies::table.filter(strategies::id.eq(id.get())))
                .set((
                    strategies::total_signals.eq(0),
                    strategies::wins.eq(0),
                    strategies::losses.eq(0),
                    strategies::wins_with_gale.eq(0),
                    strategies::wins_no_gale.eq(0),
                    strategies::updated_at.eq(timestamp(Utc::now())),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Ok(None);
            }
            Self::load_strategy(conn, id.get())
        })
    }
}

#[async_trait]
impl GameResultStore for SqliteStore {
    async fn append_result(&self, result: NewGameResult) -> Result<GameResult> {
        let mut conn = self.conn()?;
        let row = NewGameResultRow::from_domain(result, Utc::now());
        conn.immediate_transaction(|conn| {
            if Self::load_strategy(conn, row.strategy_id)?.is_none() {
                return Err(Error::NotFound {
                    entity: "strategy",
                    id: row.strategy_id,
                });
            }
            Self::insert_result(conn, &row)
        })
    }

    async fn record_signal(&self, result: NewGameResult) -> Result<GameResult> {
        let mut conn = self.conn()?;
        let row = NewGameResultRow::from_domain(result, Utc::now());
        conn.immediate_transaction(|conn| {
            let target = strategies::table.filter(strategies::id.eq(row.strategy_id));
            let updated = diesel::update(target)
                .set(strategies::total_signals.eq(strategies::total_signals + 1))
                .execute(conn)?;
            if updated == 0 {
                return Err(Error::NotFound {
                    entity: "strategy",
                    id: row.strategy_id,
                });
            }
            Self::insert_result(conn, &row)
        })
    }

    async fn get_result(&self, id: i32) -> Result<Option<GameResult>> {
        let mut conn = self.conn()?;
        Self::load_result(&mut conn, id)
    }

    async fn resolve_result(&self, id: i32, resolution: Resolution) -> Result<Option<GameResult>> {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let Some(result) = Self::load_result(conn, id)? else {
                return Ok(None);
            };
            if result.resolution.is_some() {
                return Err(Error::Validation(format!(
                    "game result {id} is already resolved"
                )));
            }

            let now = timestamp(Utc::now());
            diesel::update(game_results::table.filter(game_results::id.eq(id)))
                .set((
                    game_results::result.eq(Some(resolution.as_str())),
                    game_results::resolved_at.eq(Some(now.as_str())),
                ))
                .execute(conn)?;

            let target = strategies::table.filter(strategies::id.eq(result.strategy_id.get()));
            match resolution {
                Resolution::Win { gale: true } => diesel::update(target)
                    .set((
                        strategies::wins.eq(strategies::wins + 1),
                        strategies::wins_with_gale.eq(strategies::wins_with_gale + 1),
                        strategies::updated_at.eq(&now),
                    ))
                    .execute(conn)?,
                Resolution::Win { gale: false } => diesel::update(target)
                    .set((
                        strategies::wins.eq(strategies::wins + 1),
                        strategies::wins_no_gale.eq(strategies::wins_no_gale + 1),
                        strategies::updated_at.eq(&now),
                    ))
                    .execute(conn)?,
                Resolution::Loss => diesel::update(target)
                    .set((
                        strategies::losses.eq(strategies::losses + 1),
                        strategies::updated_at.eq(&now),
                    ))
                    .execute(conn)?,
            };

            Self::load_result(conn, id)
        })
    }

    async fn recent_results(
        &self,
        strategy_id: StrategyId,
        limit: usize,
    ) -> Result<Vec<GameResult>> {
        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        game_results::table
            .filter(game_results::strategy_id.eq(strategy_id.get()))
            .order(game_results::id.desc())
            .limit(limit)
            .select(GameResultRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(GameResultRow::into_domain)
            .collect()
    }
}
