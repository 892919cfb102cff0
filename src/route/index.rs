use axum::{response::Html, routing::get, Router};

use crate::state::ApiState;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>People Management API</title>
</head>
<body>
    <h1>People Management API</h1>
    <p>Create, read, update and delete person records.</p>

    <h2>Endpoints</h2>
    <ul>
        <li><code>GET /</code> - this page</li>
        <li><code>GET /person</code> - list every person</li>
        <li><code>POST /person</code> - create a person</li>
        <li><code>GET /person/:id</code> - get one person</li>
        <li><code>PUT /person/:id</code> - update the supplied fields of a person</li>
        <li><code>DELETE /person/:id</code> - delete a person</li>
    </ul>

    <h2>Person fields</h2>
    <ul>
        <li><code>name</code> - string, required, trimmed, not empty</li>
        <li><code>age</code> - integer, required, at least 0</li>
        <li><code>gender</code> - one of <code>Male</code>, <code>Female</code>, <code>Other</code>, required</li>
        <li><code>mobileNumber</code> - exactly 10 digits, required, trimmed</li>
    </ul>
    <p>On update every field is optional. <code>id</code>, <code>createdAt</code> and <code>updatedAt</code> are set by the server.</p>
</body>
</html>
"#;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new().route("/", get(index))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
