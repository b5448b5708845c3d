//! Console command parsing.
//!
//! Pure functions only, so the input handling is testable without a
//! terminal.

use crate::domain::ConversationId;

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Send a raw JSON payload over the socket
    Send(serde_json::Value),
    /// Send a keep-alive ping
    Ping,
    /// Mark a conversation with `n` unread messages as read
    Read(u64),
    /// Show the unread counter
    Unread,
    /// Open a conversation (toast action)
    Open(ConversationId),
    /// Click the last desktop notification
    Click,
    /// Ask for desktop notification permission
    Notifications,
    /// Simulate the window becoming hidden (`true`) or visible
    Hidden(bool),
    /// Drop the token and stop the connection
    Logout,
    Help,
    Quit,
    /// Unparseable input, with the reason
    Invalid(String),
}

/// Parse one input line
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return match serde_json::from_str(line) {
            Ok(value) => Command::Send(value),
            Err(e) => Command::Invalid(format!("payload is not valid JSON: {}", e)),
        };
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("ping", None) => Command::Ping,
        ("unread", None) => Command::Unread,
        ("read", Some(n)) => n
            .parse()
            .map(Command::Read)
            .unwrap_or_else(|_| Command::Invalid(format!("invalid count: {}", n))),
        ("read", None) => Command::Read(1),
        ("open", Some(id)) => id
            .parse::<i64>()
            .map(|id| Command::Open(ConversationId::new(id)))
            .unwrap_or_else(|_| Command::Invalid(format!("invalid conversation id: {}", id))),
        ("click", None) => Command::Click,
        ("notifications", None) => Command::Notifications,
        ("hide", None) => Command::Hidden(true),
        ("show", None) => Command::Hidden(false),
        ("logout", None) => Command::Logout,
        ("help", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        _ => Command::Invalid(format!("unknown command: /{}", rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_is_sent_as_payload() {
        // テスト項目: JSON の行はそのまま送信ペイロードになる
        // given (前提条件):
        let line = r#"{"type":"typing","conversation_id":3}"#;

        // when (操作):
        let command = parse_command(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Command::Send(serde_json::json!({"type": "typing", "conversation_id": 3}))
        );
    }

    #[test]
    fn test_plain_text_is_rejected() {
        // テスト項目: JSON でない行はエラーになる
        // given (前提条件):
        let line = "hello there";

        // when (操作):
        let command = parse_command(line);

        // then (期待する結果):
        assert!(matches!(command, Command::Invalid(_)));
    }

    #[test]
    fn test_slash_commands() {
        // テスト項目: スラッシュコマンドが正しく解析される
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(parse_command("/ping"), Command::Ping);
        assert_eq!(parse_command("/read 4"), Command::Read(4));
        assert_eq!(parse_command("/read"), Command::Read(1));
        assert_eq!(
            parse_command("/open 12"),
            Command::Open(ConversationId::new(12))
        );
        assert_eq!(parse_command("  /hide "), Command::Hidden(true));
        assert_eq!(parse_command("/show"), Command::Hidden(false));
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/notifications"), Command::Notifications);
        assert_eq!(parse_command("/click"), Command::Click);
    }

    #[test]
    fn test_invalid_slash_commands() {
        // テスト項目: 不正な引数や未知のコマンドはエラーになる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert!(matches!(parse_command("/read many"), Command::Invalid(_)));
        assert!(matches!(parse_command("/read -1"), Command::Invalid(_)));
        assert!(matches!(parse_command("/open x"), Command::Invalid(_)));
        assert!(matches!(parse_command("/dance"), Command::Invalid(_)));
        assert!(matches!(parse_command("/ping now"), Command::Invalid(_)));
    }
}
