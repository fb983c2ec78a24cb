//! Database-backed lending scenarios.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::json;
use sqlx::PgPool;

use bookshelf_server::models::user::Role;
use common::{app, cover_path, multipart, multipart_with_file, request, send, token};

async fn register(app: &Router, username: &str) -> i32 {
    let (status, body) = send(
        app.clone(),
        request(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({ "username": username, "password": "123456" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().expect("user id") as i32
}

async fn insert_book(pool: &PgPool, isbn: &str, stock: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO books (isbn, title, author, stock, total) VALUES ($1, $2, 'Frank Herbert', $3, GREATEST($3, 1)) RETURNING id",
    )
    .bind(isbn)
    .bind(format!("Book {}", isbn))
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("insert book")
}

async fn promote_admin(pool: &PgPool, user_id: i32) -> String {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("promote");
    token(user_id, Role::Admin)
}

async fn stock_of(pool: &PgPool, book_id: i32) -> i32 {
    sqlx::query_scalar("SELECT stock FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("stock")
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_register_then_login(pool: PgPool) {
    let app = app(pool);
    register(&app, "abc").await;

    let (status, body) = send(
        app.clone(),
        request(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({ "username": "abc", "password": "654321" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Username already exists");

    let (status, body) = send(
        app.clone(),
        request(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "username": "abc", "password": "123456" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["user"].get("password").is_none());

    let (status, _) = send(
        app,
        request(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "username": "abc", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_borrow_out_of_stock(pool: PgPool) {
    let app = app(pool.clone());
    let reader = register(&app, "reader1").await;
    let book = insert_book(&pool, "978-0", 0).await;

    let (status, body) = send(
        app,
        request(
            Method::POST,
            &format!("/api/borrows/{}", book),
            Some(&token(reader, Role::Reader)),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Book out of stock");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_borrow_and_return_cycle(pool: PgPool) {
    let app = app(pool.clone());
    let owner = register(&app, "owner").await;
    let other = register(&app, "other").await;
    let book = insert_book(&pool, "978-1", 2).await;
    let owner_token = token(owner, Role::Reader);

    let (status, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&owner_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "borrowed");
    assert_eq!(body["data"]["is_overdue"], false);
    assert_eq!(body["data"]["days_left"], 30);
    let record = body["data"]["id"].as_i64().expect("record id");
    assert_eq!(stock_of(&pool, book).await, 1);

    // a second active loan of the same book is refused
    let (status, _) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&owner_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&token(other, Role::Reader)),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&owner_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "returned");
    assert!(body["data"]["days_left"].is_null());
    assert_eq!(stock_of(&pool, book).await, 2);

    let (status, _) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&owner_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // borrow and return notifications
    let (_, body) = send(
        app,
        request(Method::GET, "/api/notifications/unread-count", Some(&owner_token), None),
    )
    .await;
    assert_eq!(body["data"]["unread_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renewal_limit(pool: PgPool) {
    let app = app(pool.clone());
    let reader = register(&app, "renewer").await;
    let book = insert_book(&pool, "978-2", 1).await;
    let reader_token = token(reader, Role::Reader);

    let (_, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&reader_token), None),
    )
    .await;
    let record = body["data"]["id"].as_i64().expect("record id");
    let renew = format!("/api/borrows/{}/renew", record);

    for expected in 1..=3 {
        let (status, body) = send(
            app.clone(),
            request(Method::POST, &renew, Some(&reader_token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["renewal_count"], expected);
    }

    let (status, _) = send(app, request(Method::POST, &renew, Some(&reader_token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reservation_queue(pool: PgPool) {
    let app = app(pool.clone());
    let first = token(register(&app, "first").await, Role::Reader);
    let second = token(register(&app, "second").await, Role::Reader);
    let third = token(register(&app, "third").await, Role::Reader);
    let book = insert_book(&pool, "978-3", 0).await;
    let reserve = format!("/api/reservations/{}", book);

    let (status, body) = send(app.clone(), request(Method::POST, &reserve, Some(&first), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["queue_position"], 1);
    let first_reservation = body["data"]["id"].as_i64().expect("reservation id");

    // already waiting
    let (status, _) = send(app.clone(), request(Method::POST, &reserve, Some(&first), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(app.clone(), request(Method::POST, &reserve, Some(&second), None)).await;
    assert_eq!(body["data"]["queue_position"], 2);

    let (status, _) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/reservations/{}/cancel", first_reservation),
            Some(&first),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // positions keep increasing after a cancellation
    let (_, body) = send(app.clone(), request(Method::POST, &reserve, Some(&third), None)).await;
    assert_eq!(body["data"]["queue_position"], 3);
    assert_eq!(body["data"]["rank"], 2);

    let (status, body) = send(
        app,
        request(Method::GET, &format!("/api/reservations/queue/{}", book), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let queue = body["data"].as_array().expect("queue");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["username"], "second");
    assert_eq!(queue[0]["rank"], 1);
    assert_eq!(queue[1]["username"], "third");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_return_notifies_head_of_queue(pool: PgPool) {
    let app = app(pool.clone());
    let borrower = token(register(&app, "borrower").await, Role::Reader);
    let waiter_id = register(&app, "waiter").await;
    let waiter = token(waiter_id, Role::Reader);
    let book = insert_book(&pool, "978-4", 1).await;

    let (_, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&borrower), None),
    )
    .await;
    let record = body["data"]["id"].as_i64().expect("record id");

    send(
        app.clone(),
        request(Method::POST, &format!("/api/reservations/{}", book), Some(&waiter), None),
    )
    .await;
    send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&borrower),
            None,
        ),
    )
    .await;

    let (_, body) = send(
        app.clone(),
        request(Method::GET, "/api/reservations/my-reservations", Some(&waiter), None),
    )
    .await;
    assert_eq!(body["data"][0]["status"], "notified");

    // borrowing the book closes the reservation
    let (status, _) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&waiter), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        app,
        request(
            Method::GET,
            "/api/reservations/my-reservations?status=finished",
            Some(&waiter),
            None,
        ),
    )
    .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_comment_upsert_updates_average(pool: PgPool) {
    let app = app(pool.clone());
    let alice = token(register(&app, "alice").await, Role::Reader);
    let bob = token(register(&app, "bob").await, Role::Reader);
    let book = insert_book(&pool, "978-5", 1).await;
    let comment = format!("/api/comments/{}", book);

    for (user, rating) in [(&alice, 2), (&alice, 4), (&bob, 5)] {
        let (status, _) = send(
            app.clone(),
            request(
                Method::POST,
                &comment,
                Some(user),
                Some(json!({ "rating": rating, "comment": "Worth reading" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(
        app.clone(),
        request(Method::POST, &comment, Some(&bob), Some(json!({ "rating": 6 }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        app.clone(),
        request(Method::GET, &format!("/api/comments/book/{}", book), None, None),
    )
    .await;
    assert_eq!(body["pagination"]["total"], 2);

    let (_, body) = send(app, request(Method::GET, &format!("/api/books/{}", book), None, None)).await;
    assert_eq!(body["data"]["avg_rating"], 4.5);
    assert_eq!(body["data"]["comments"].as_array().map(Vec::len), Some(2));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_admin_creates_book_and_audits(pool: PgPool) {
    let app = app(pool.clone());
    let admin_id = register(&app, "librarian").await;
    let admin = promote_admin(&pool, admin_id).await;

    let (status, body) = send(
        app.clone(),
        multipart(
            "/api/books",
            &admin,
            &[("isbn", "978-6"), ("title", "Dune"), ("price", "12.5")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["stock"], 1);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["price"], 12.5);

    let (status, body) = send(
        app.clone(),
        multipart("/api/books", &admin, &[("isbn", "978-6"), ("title", "Dune again")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "ISBN already exists");

    let (_, body) = send(
        app,
        request(Method::GET, "/api/admin/logs?action=create_book", Some(&admin), None),
    )
    .await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["username"], "librarian");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_frozen_account_keeps_token_but_loses_access(pool: PgPool) {
    let app = app(pool.clone());
    let admin = promote_admin(&pool, register(&app, "warden").await).await;
    let reader_id = register(&app, "suspect").await;
    let reader = token(reader_id, Role::Reader);
    let lent = insert_book(&pool, "978-10", 2).await;
    let wanted = insert_book(&pool, "978-11", 0).await;

    let (_, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", lent), Some(&reader), None),
    )
    .await;
    let record = body["data"]["id"].as_i64().expect("record id");

    let (status, _) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/admin/users/{}/freeze", reader_id),
            Some(&admin),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the token issued before the freeze is still valid, the account is not
    let attempts = [
        (format!("/api/borrows/{}", wanted), None),
        (format!("/api/borrows/{}/renew", record), None),
        (format!("/api/reservations/{}", wanted), None),
        (format!("/api/comments/{}", lent), Some(json!({ "rating": 1 }))),
    ];
    for (uri, body) in attempts {
        let (status, response) =
            send(app.clone(), request(Method::POST, &uri, Some(&reader), body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(response["msg"], "Account is frozen");
    }
    assert_eq!(stock_of(&pool, wanted).await, 0);

    // books already out can still be brought back
    let (status, _) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&reader),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/admin/users/{}/unfreeze", reader_id),
            Some(&admin),
            None,
        ),
    )
    .await;
    let (status, _) = send(
        app,
        request(Method::POST, &format!("/api/borrows/{}", lent), Some(&reader), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_huge_page_number_returns_empty_page(pool: PgPool) {
    let app = app(pool.clone());
    insert_book(&pool, "978-12", 1).await;

    let (status, body) = send(
        app,
        request(Method::GET, "/api/books?page=9223372036854775807", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_overdue_loans_are_listed(pool: PgPool) {
    let app = app(pool.clone());
    let reader = token(register(&app, "latecomer").await, Role::Reader);
    let late_book = insert_book(&pool, "978-13", 1).await;
    let fresh_book = insert_book(&pool, "978-14", 1).await;

    let mut records = Vec::new();
    for book in [late_book, fresh_book] {
        let (status, body) = send(
            app.clone(),
            request(Method::POST, &format!("/api/borrows/{}", book), Some(&reader), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        records.push(body["data"]["id"].as_i64().expect("record id"));
    }

    sqlx::query(
        "UPDATE borrow_records SET borrow_time = NOW() - INTERVAL '40 days', due_time = NOW() - INTERVAL '10 days' WHERE id = $1",
    )
    .bind(records[0] as i32)
    .execute(&pool)
    .await
    .expect("backdate");

    for uri in ["/api/borrows/overdue", "/api/borrows/my-records?status=overdue"] {
        let (status, body) = send(app.clone(), request(Method::GET, uri, Some(&reader), None)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        let overdue = body["data"].as_array().expect("records");
        assert_eq!(overdue.len(), 1, "{}", uri);
        assert_eq!(overdue[0]["id"], records[0]);
        assert_eq!(overdue[0]["book_id"], late_book);
        assert_eq!(overdue[0]["status"], "borrowed");
        assert_eq!(overdue[0]["is_overdue"], true);
        assert!(overdue[0]["days_left"].as_i64().expect("days left") <= -10);
    }

    let (_, body) = send(
        app,
        request(Method::GET, "/api/borrows/my-records?status=borrowed", Some(&reader), None),
    )
    .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_cancelled_reservation_cannot_be_cancelled_again(pool: PgPool) {
    let app = app(pool.clone());
    let reader = token(register(&app, "fickle").await, Role::Reader);
    let book = insert_book(&pool, "978-15", 0).await;

    let (_, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/reservations/{}", book), Some(&reader), None),
    )
    .await;
    let cancel = format!(
        "/api/reservations/{}/cancel",
        body["data"]["id"].as_i64().expect("reservation id")
    );

    let (status, body) = send(app.clone(), request(Method::POST, &cancel, Some(&reader), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (status, body) = send(app, request(Method::POST, &cancel, Some(&reader), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Reservation is already cancelled");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_cancelling_notified_reservation_promotes_next(pool: PgPool) {
    let app = app(pool.clone());
    let borrower = token(register(&app, "holder").await, Role::Reader);
    let first = token(register(&app, "head").await, Role::Reader);
    let second = token(register(&app, "next").await, Role::Reader);
    let book = insert_book(&pool, "978-16", 1).await;
    let reserve = format!("/api/reservations/{}", book);

    let (_, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&borrower), None),
    )
    .await;
    let record = body["data"]["id"].as_i64().expect("record id");

    let (_, body) = send(app.clone(), request(Method::POST, &reserve, Some(&first), None)).await;
    let head_reservation = body["data"]["id"].as_i64().expect("reservation id");
    send(app.clone(), request(Method::POST, &reserve, Some(&second), None)).await;

    send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&borrower),
            None,
        ),
    )
    .await;

    let (_, body) = send(
        app.clone(),
        request(Method::GET, "/api/reservations/my-reservations", Some(&second), None),
    )
    .await;
    assert_eq!(body["data"][0]["status"], "waiting");

    let (status, _) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/reservations/{}/cancel", head_reservation),
            Some(&first),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        app.clone(),
        request(Method::GET, "/api/reservations/my-reservations", Some(&second), None),
    )
    .await;
    assert_eq!(body["data"][0]["status"], "notified");

    // reservation placed, then availability
    let (_, body) = send(
        app,
        request(Method::GET, "/api/notifications/unread-count", Some(&second), None),
    )
    .await;
    assert_eq!(body["data"]["unread_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_deleting_last_comment_resets_average(pool: PgPool) {
    let app = app(pool.clone());
    let reader = token(register(&app, "critic").await, Role::Reader);
    let book = insert_book(&pool, "978-17", 1).await;

    let (status, body) = send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/comments/{}", book),
            Some(&reader),
            Some(json!({ "rating": 3 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comment = body["data"]["id"].as_i64().expect("comment id");

    let (_, body) = send(app.clone(), request(Method::GET, &format!("/api/books/{}", book), None, None)).await;
    assert_eq!(body["data"]["avg_rating"], 3.0);

    let (status, _) = send(
        app.clone(),
        request(Method::DELETE, &format!("/api/comments/{}", comment), Some(&reader), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app, request(Method::GET, &format!("/api/books/{}", book), None, None)).await;
    assert_eq!(body["data"]["avg_rating"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_with_active_loan_cannot_be_deleted(pool: PgPool) {
    let app = app(pool.clone());
    let admin = promote_admin(&pool, register(&app, "curator").await).await;
    let reader = token(register(&app, "keeper").await, Role::Reader);
    let book = insert_book(&pool, "978-18", 1).await;

    let (_, body) = send(
        app.clone(),
        request(Method::POST, &format!("/api/borrows/{}", book), Some(&reader), None),
    )
    .await;
    let record = body["data"]["id"].as_i64().expect("record id");

    let (status, body) = send(
        app.clone(),
        request(Method::DELETE, &format!("/api/books/{}", book), Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Book has 1 copies on loan and cannot be deleted");

    send(
        app.clone(),
        request(
            Method::POST,
            &format!("/api/borrows/{}/return", record),
            Some(&reader),
            None,
        ),
    )
    .await;

    let (status, _) = send(
        app.clone(),
        request(Method::DELETE, &format!("/api/books/{}", book), Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app, request(Method::GET, &format!("/api/books/{}", book), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_cover_update_replaces_file(pool: PgPool) {
    let app = app(pool.clone());
    let admin = promote_admin(&pool, register(&app, "designer").await).await;

    let (status, body) = send(
        app.clone(),
        multipart_with_file(
            Method::POST,
            "/api/books",
            &admin,
            &[("isbn", "978-19"), ("title", "Covered")],
            Some(("first.png", b"first cover".as_slice())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let book = body["data"]["id"].as_i64().expect("book id");
    let old_url = body["data"]["cover_url"].as_str().expect("cover url").to_string();
    assert!(old_url.starts_with("/uploads/covers/book_"));
    let old_file = cover_path(&old_url);
    assert!(old_file.exists());

    let (status, body) = send(
        app,
        multipart_with_file(
            Method::PUT,
            &format!("/api/books/{}", book),
            &admin,
            &[("title", "Recovered")],
            Some(("second.jpg", b"second cover".as_slice())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let new_url = body["data"]["cover_url"].as_str().expect("cover url");
    assert_ne!(new_url, old_url);
    assert!(new_url.ends_with(".jpg"));

    assert!(!old_file.exists());
    let new_file = cover_path(new_url);
    assert_eq!(std::fs::read(&new_file).expect("new cover"), b"second cover");
    std::fs::remove_file(new_file).ok();
}
