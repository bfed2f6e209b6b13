//! Admin console (C13): a stdin-reading thread feeding a mutex-guarded queue
//! the tick loop drains once per tick. Commands are never applied directly
//! from the console thread.

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use mp_core::PlayerId;

#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    Help,
    Status,
    Players,
    Kick(PlayerId),
    Say(String),
    Save,
    Stop,
}

impl AdminCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        let verb = parts.next().unwrap_or("").to_ascii_lowercase();
        let rest = parts.next().unwrap_or("").trim();
        match verb.as_str() {
            "help" => Some(AdminCommand::Help),
            "status" => Some(AdminCommand::Status),
            "players" => Some(AdminCommand::Players),
            "kick" => rest.parse::<PlayerId>().ok().map(AdminCommand::Kick),
            "say" => Some(AdminCommand::Say(rest.to_string())),
            "save" => Some(AdminCommand::Save),
            "stop" | "quit" | "exit" => Some(AdminCommand::Stop),
            _ => None,
        }
    }
}

pub type AdminQueue = Arc<Mutex<Vec<AdminCommand>>>;

/// Spawns the stdin-reading thread; returns the queue the tick loop should
/// drain. Unrecognized input is logged and dropped, never queued.
pub fn spawn_console() -> AdminQueue {
    let queue: AdminQueue = Arc::new(Mutex::new(Vec::new()));
    let queue_for_thread = queue.clone();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match AdminCommand::parse(&line) {
                Some(cmd) => queue_for_thread.lock().unwrap().push(cmd),
                None => log::debug!("unrecognized admin command: {line:?}"),
            }
        }
    });
    queue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_accepted_verb() {
        assert_eq!(AdminCommand::parse("help"), Some(AdminCommand::Help));
        assert_eq!(AdminCommand::parse("status"), Some(AdminCommand::Status));
        assert_eq!(AdminCommand::parse("players"), Some(AdminCommand::Players));
        assert_eq!(AdminCommand::parse("kick 7"), Some(AdminCommand::Kick(7)));
        assert_eq!(
            AdminCommand::parse("say hello there"),
            Some(AdminCommand::Say("hello there".to_string()))
        );
        assert_eq!(AdminCommand::parse("save"), Some(AdminCommand::Save));
        assert_eq!(AdminCommand::parse("stop"), Some(AdminCommand::Stop));
        assert_eq!(AdminCommand::parse("quit"), Some(AdminCommand::Stop));
        assert_eq!(AdminCommand::parse("exit"), Some(AdminCommand::Stop));
    }

    #[test]
    fn rejects_unrecognized_input() {
        assert_eq!(AdminCommand::parse("fly to the moon"), None);
        assert_eq!(AdminCommand::parse(""), None);
        assert_eq!(AdminCommand::parse("   "), None);
    }

    #[test]
    fn kick_requires_a_numeric_id() {
        assert_eq!(AdminCommand::parse("kick abc"), None);
        assert_eq!(AdminCommand::parse("kick"), None);
    }

    #[test]
    fn is_case_insensitive_on_the_verb() {
        assert_eq!(AdminCommand::parse("STATUS"), Some(AdminCommand::Status));
        assert_eq!(AdminCommand::parse("Kick 3"), Some(AdminCommand::Kick(3)));
    }
}
