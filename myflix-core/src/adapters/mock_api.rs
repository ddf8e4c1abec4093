//! Mock MyFlix API server for testing
//!
//! A small HTTP/1.1 server on a background thread that implements the whole
//! MyFlix REST contract against an in-memory store:
//! - POST /users, POST /login
//! - GET /movies, /movies/{title}, /genres/{name}, /directors/{name}
//! - GET|PUT|DELETE /users/{username}, GET /users/{username}/movies
//! - PUT /users/{username}/add-movies/{id}, DELETE /users/{username}/delete-movies/{id}
//!
//! Tokens have the form `token-<user id>`, so they survive a rename.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value as JsonValue};

/// Mock MyFlix server for testing
pub struct MockMyflixServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
    state: Arc<Mutex<MockState>>,
}

/// Failure switches
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Answer every request with HTTP 500
    pub fail_all: bool,
    /// Answer requests whose path starts with one of these with HTTP 500
    pub failing_paths: Vec<String>,
    /// Apply the request but answer 2xx with an empty body
    pub empty_success_bodies: bool,
}

/// A request as seen by the server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct MockUser {
    id: String,
    username: String,
    password: String,
    email: String,
    birthday: Option<String>,
    favorites: Vec<String>,
}

impl MockUser {
    fn to_json(&self) -> JsonValue {
        json!({
            "_id": self.id,
            "Username": self.username,
            "Password": format!("hashed:{}", self.password),
            "Email": self.email,
            "Birthday": self.birthday.as_ref().map(|b| format!("{}T00:00:00.000Z", b)),
            "FavoriteMovies": self.favorites,
        })
    }
}

struct MockState {
    config: MockConfig,
    users: Vec<MockUser>,
    movies: Vec<JsonValue>,
    requests: Vec<RecordedRequest>,
    next_user_id: usize,
}

impl MockState {
    fn seeded(config: MockConfig) -> Self {
        Self {
            config,
            users: vec![MockUser {
                id: "u1".to_string(),
                username: "alice".to_string(),
                password: "pw".to_string(),
                email: "alice@example.com".to_string(),
                birthday: Some("1990-04-12".to_string()),
                favorites: Vec::new(),
            }],
            movies: seed_movies(),
            requests: Vec::new(),
            next_user_id: 2,
        }
    }

    fn user_by_name(&mut self, username: &str) -> Option<&mut MockUser> {
        self.users.iter_mut().find(|u| u.username == username)
    }

    fn user_for_token(&self, authorization: Option<&str>) -> Option<&MockUser> {
        let token = authorization?.strip_prefix("Bearer ")?.trim();
        let id = token.strip_prefix("token-")?;
        self.users.iter().find(|u| u.id == id)
    }
}

fn seed_movies() -> Vec<JsonValue> {
    let nolan = json!({ "Name": "Christopher Nolan", "Bio": "British-American filmmaker", "Birth": 1970 });
    vec![
        json!({
            "_id": "m1",
            "Title": "Inception",
            "Description": "A thief enters dreams.",
            "ImagePath": "inception.png",
            "Featured": true,
            "Genre": { "Name": "Science Fiction", "Description": "Speculative futures" },
            "Director": nolan,
        }),
        json!({
            "_id": "m2",
            "Title": "The Dark Knight",
            "Description": "Batman faces the Joker.",
            "ImagePath": "darkknight.png",
            "Featured": false,
            "Genre": { "Name": "Action", "Description": "Fights and chases" },
            "Director": nolan,
        }),
        json!({
            "_id": "m3",
            "Title": "Schindler's List",
            "Description": "A businessman saves lives.",
            "ImagePath": "SchindlersList.png",
            "Featured": false,
            "Genre": { "Name": "Drama", "Description": "Serious stories" },
            "Director": { "Name": "Steven Spielberg", "Bio": "American filmmaker", "Birth": "1946" },
        }),
    ]
}

impl MockMyflixServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Mutex::new(MockState::seeded(config)));

        // Non-blocking accept so stop() can end the loop
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let state_clone = state.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
            state,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Valid bearer token for an existing user
    pub fn token_for(&self, username: &str) -> String {
        let state = self.state.lock().unwrap();
        let user = state
            .users
            .iter()
            .find(|u| u.username == username)
            .expect("unknown mock user");
        format!("token-{}", user.id)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    /// Replace the failure switches
    pub fn set_config(&self, config: MockConfig) {
        self.state.lock().unwrap().config = config;
    }

    /// Favorites as stored server-side
    pub fn favorites_of(&self, username: &str) -> Vec<String> {
        let mut state = self.state.lock().unwrap();
        state
            .user_by_name(username)
            .map(|u| u.favorites.clone())
            .unwrap_or_default()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockMyflixServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(stream: TcpStream, state: &Arc<Mutex<MockState>>) {
    let _ = stream.set_nonblocking(false);
    let Some(request) = read_request(&stream) else {
        return;
    };

    let (status, body) = {
        let mut state = state.lock().unwrap();
        state.requests.push(request.clone());
        let (status, body) = route(&mut state, &request);
        if state.config.empty_success_bodies && (200..300).contains(&status) {
            (status, String::new())
        } else {
            (status, body)
        }
    };

    send_response(stream, status, &body);
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().unwrap_or(0),
                "authorization" => authorization = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(RecordedRequest {
        method,
        path,
        authorization,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn route(state: &mut MockState, request: &RecordedRequest) -> (u16, String) {
    let path = request.path.split('?').next().unwrap_or("");
    let failing = state.config.fail_all
        || state
            .config
            .failing_paths
            .iter()
            .any(|p| path.starts_with(p.as_str()));
    if failing {
        return (500, r#"{"error": "Internal server error"}"#.to_string());
    }

    let segments: Vec<String> = path
        .trim_start_matches('/')
        .split('/')
        .map(percent_decode)
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    let method = request.method.as_str();

    match (method, segments.as_slice()) {
        ("POST", ["users"]) => register(state, &request.body),
        ("POST", ["login"]) => login(state, &request.body),
        _ => {
            if state.user_for_token(request.authorization.as_deref()).is_none() {
                return (401, "Unauthorized".to_string());
            }
            authorized_route(state, method, &segments, &request.body)
        }
    }
}

fn authorized_route(
    state: &mut MockState,
    method: &str,
    segments: &[&str],
    body: &str,
) -> (u16, String) {
    match (method, segments) {
        ("GET", ["movies"]) => ok(JsonValue::Array(state.movies.clone())),
        ("GET", ["movies", title]) => find_movie(state, |m| m["Title"] == *title)
            .map(ok)
            .unwrap_or_else(not_found),
        ("GET", ["genres", name]) => find_movie(state, |m| m["Genre"]["Name"] == *name)
            .map(|m| ok(m["Genre"].clone()))
            .unwrap_or_else(not_found),
        ("GET", ["directors", name]) => find_movie(state, |m| m["Director"]["Name"] == *name)
            .map(|m| ok(m["Director"].clone()))
            .unwrap_or_else(not_found),
        ("GET", ["users", username]) => state
            .user_by_name(username)
            .map(|u| ok(u.to_json()))
            .unwrap_or_else(not_found),
        ("GET", ["users", username, "movies"]) => state
            .user_by_name(username)
            .map(|u| ok(json!(u.favorites)))
            .unwrap_or_else(not_found),
        ("PUT", ["users", username, "add-movies", movie_id]) => {
            match state.user_by_name(username) {
                Some(user) => {
                    if !user.favorites.iter().any(|f| f == movie_id) {
                        user.favorites.push(movie_id.to_string());
                    }
                    ok(user.to_json())
                }
                None => not_found(),
            }
        }
        ("DELETE", ["users", username, "delete-movies", movie_id]) => {
            match state.user_by_name(username) {
                Some(user) => {
                    user.favorites.retain(|f| f != movie_id);
                    ok(user.to_json())
                }
                None => not_found(),
            }
        }
        ("PUT", ["users", username]) => edit_user(state, username, body),
        ("DELETE", ["users", username]) => {
            let before = state.users.len();
            state.users.retain(|u| u.username != *username);
            if state.users.len() < before {
                (200, format!("{} was deleted.", username))
            } else {
                (400, format!("{} was not found", username))
            }
        }
        _ => not_found(),
    }
}

fn find_movie<F>(state: &MockState, predicate: F) -> Option<JsonValue>
where
    F: Fn(&JsonValue) -> bool,
{
    state.movies.iter().find(|m| predicate(m)).cloned()
}

fn register(state: &mut MockState, body: &str) -> (u16, String) {
    let Ok(payload) = serde_json::from_str::<JsonValue>(body) else {
        return (400, "Invalid body".to_string());
    };
    let (Some(username), Some(password)) = (payload["Username"].as_str(), payload["Password"].as_str())
    else {
        return (422, r#"{"errors": ["Username and Password are required"]}"#.to_string());
    };
    if state.users.iter().any(|u| u.username == username) {
        return (400, format!("{} already exists", username));
    }

    let user = MockUser {
        id: format!("u{}", state.next_user_id),
        username: username.to_string(),
        password: password.to_string(),
        email: payload["Email"].as_str().unwrap_or_default().to_string(),
        birthday: payload["Birthday"].as_str().map(str::to_string),
        favorites: Vec::new(),
    };
    state.next_user_id += 1;
    let json = user.to_json();
    state.users.push(user);
    (201, json.to_string())
}

fn login(state: &mut MockState, body: &str) -> (u16, String) {
    let Ok(payload) = serde_json::from_str::<JsonValue>(body) else {
        return (400, "Invalid body".to_string());
    };
    let username = payload["Username"].as_str().unwrap_or_default();
    let password = payload["Password"].as_str().unwrap_or_default();

    match state
        .users
        .iter()
        .find(|u| u.username == username && u.password == password)
    {
        Some(user) => ok(json!({ "user": user.to_json(), "token": format!("token-{}", user.id) })),
        None => (400, r#"{"message": "Incorrect username or password."}"#.to_string()),
    }
}

fn edit_user(state: &mut MockState, username: &str, body: &str) -> (u16, String) {
    let Ok(payload) = serde_json::from_str::<JsonValue>(body) else {
        return (400, "Invalid body".to_string());
    };
    if let Some(new_name) = payload["Username"].as_str() {
        if new_name != username && state.users.iter().any(|u| u.username == new_name) {
            return (400, format!("{} already exists", new_name));
        }
    }

    let Some(user) = state.user_by_name(username) else {
        return not_found();
    };
    if let Some(v) = payload["Username"].as_str() {
        user.username = v.to_string();
    }
    if let Some(v) = payload["Password"].as_str() {
        user.password = v.to_string();
    }
    if let Some(v) = payload["Email"].as_str() {
        user.email = v.to_string();
    }
    if let Some(v) = payload["Birthday"].as_str() {
        user.birthday = Some(v.to_string());
    }
    ok(user.to_json())
}

fn ok(value: JsonValue) -> (u16, String) {
    (200, value.to_string())
}

fn not_found() -> (u16, String) {
    (404, r#"{"error": "Not found"}"#.to_string())
}

fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn send_response(mut stream: TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    };
    let content_type = if body.starts_with('{') || body.starts_with('[') {
        "application/json"
    } else {
        "text/plain"
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_starts() {
        let server = MockMyflixServer::start(MockConfig::default()).unwrap();
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
        assert_eq!(server.token_for("alice"), "token-u1");
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("The%20Dark%20Knight"), "The Dark Knight");
        assert_eq!(percent_decode("Schindler's%20List"), "Schindler's List");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("plain"), "plain");
    }
}
