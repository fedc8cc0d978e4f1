//! Test chat client.
//!
//! Provides a line-oriented client for integration testing that can send
//! requests and assert on received JSON pushes.

use parlor_proto::{Response, RoomId, UserId};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test chat client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        // Split stream for reading and writing
        let (read_half, write_half) = stream.into_split();
        let reader = BufReader::new(read_half);
        let writer = BufWriter::new(write_half);

        Ok(Self { reader, writer })
    }

    /// Send a raw request line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single response from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Response> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a response with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Response> {
        let mut line = String::new();
        timeout(dur, self.reader.read_line(&mut line)).await??;

        serde_json::from_str(line.trim_end())
            .map_err(|e| anyhow::anyhow!("Parse error on {:?}: {}", line, e))
    }

    /// Receive responses until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Response>>
    where
        F: FnMut(&Response) -> bool,
    {
        let mut responses = Vec::new();
        loop {
            let resp = self.recv().await?;
            let done = predicate(&resp);
            responses.push(resp);
            if done {
                break;
            }
        }
        Ok(responses)
    }

    /// Consume the `Welcome` line the server opens every session with.
    pub async fn welcome(&mut self) -> anyhow::Result<UserId> {
        match self.recv().await? {
            Response::Welcome { user_id } => Ok(user_id),
            other => anyhow::bail!("Expected Welcome, got {:?}", other),
        }
    }

    /// Log in and wait for the initial view pushes to land.
    pub async fn login(
        &mut self,
        name: &str,
        age: u32,
        location: &str,
        school: &str,
    ) -> anyhow::Result<()> {
        self.send_raw(&format!("login|{}|{}|{}|{}", name, age, location, school))
            .await?;

        // Login pushes UserChatHistory then UserRooms; only this user's own
        // views travel on this connection, so any UserRooms is ours.
        self.recv_until(|resp| matches!(resp, Response::UserRooms { .. }))
            .await?;
        Ok(())
    }

    /// Create a room and return its id, learned from the refreshed room list.
    #[allow(dead_code)]
    pub async fn create(
        &mut self,
        name: &str,
        age_lower: u32,
        age_upper: u32,
        locations: &str,
        schools: &str,
    ) -> anyhow::Result<RoomId> {
        self.send_raw(&format!(
            "create|{}|{}|{}|{}|{}",
            name, age_lower, age_upper, locations, schools
        ))
        .await?;

        let responses = self
            .recv_until(|resp| {
                matches!(resp, Response::UserRooms { owned, .. }
                    if owned.iter().any(|room| room.name == name))
            })
            .await?;

        match responses.last() {
            Some(Response::UserRooms { owned, .. }) => owned
                .iter()
                .find(|room| room.name == name)
                .map(|room| room.id)
                .ok_or_else(|| anyhow::anyhow!("Created room missing from owned list")),
            other => anyhow::bail!("Expected UserRooms, got {:?}", other),
        }
    }

    /// Join a room and wait for the membership view to confirm it.
    #[allow(dead_code)]
    pub async fn join(&mut self, room_id: RoomId) -> anyhow::Result<()> {
        self.send_raw(&format!("join|{}", room_id)).await?;
        self.recv_until(|resp| {
            matches!(resp, Response::UserRooms { joined, .. }
                if joined.iter().any(|room| room.id == room_id))
        })
        .await?;
        Ok(())
    }

    /// Send a direct message inside a room.
    #[allow(dead_code)]
    pub async fn send_message(
        &mut self,
        room_id: RoomId,
        receiver: UserId,
        text: &str,
    ) -> anyhow::Result<()> {
        self.send_raw(&format!("send|{}|{}|{}", room_id, receiver, text))
            .await?;
        Ok(())
    }
}
