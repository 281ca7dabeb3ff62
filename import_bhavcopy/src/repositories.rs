use crate::entities::BhavEntry;
use anyhow::{Context, Result};
use redis::{Client, Cmd, Connection};

pub trait Repository {
    /// Drops every entry of the previous load.
    fn clear(&mut self) -> Result<()>;
    /// Writes `entry` under its normalized name, replacing whatever is stored there.
    fn upsert(&mut self, entry: &BhavEntry) -> Result<()>;
}

pub struct RedisRepository {
    connection: Connection,
}

impl RedisRepository {
    pub fn new(host: &str, port: u16, db: i64) -> Result<Self> {
        let connection = RedisRepository::connect(host, port, db)?;
        Ok(Self { connection })
    }

    fn connect(host: &str, port: u16, db: i64) -> Result<Connection> {
        let connection_str = format!("redis://{host}:{port}/{db}");
        let client = Client::open(connection_str.as_str())
            .with_context(|| format!("{connection_str} is not a valid redis url."))?;
        client
            .get_connection()
            .with_context(|| format!("redis at {host}:{port} cannot be reached."))
    }
}

impl Repository for RedisRepository {
    fn clear(&mut self) -> Result<()> {
        redis::cmd("FLUSHDB")
            .query::<()>(&mut self.connection)
            .context("FLUSHDB failed.")
    }

    fn upsert(&mut self, entry: &BhavEntry) -> Result<()> {
        let key = entry.key();
        hset_command(&key, entry)
            .query::<()>(&mut self.connection)
            .with_context(|| format!("HSET {key} failed."))
    }
}

fn hset_command(key: &str, entry: &BhavEntry) -> Cmd {
    let mut cmd = redis::cmd("HSET");
    cmd.arg(key).arg(&entry.fields()[..]);
    cmd
}

#[cfg(test)]
pub use memory::MemoryRepository;
