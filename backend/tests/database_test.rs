mod helpers;

use helpers::*;
use padel_backend::error::RepositoryError;
use padel_backend::models::*;
use padel_backend::repositories::*;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn draft(user: &User, venue: &Venue, court: i32, start: (u32, u32), end: (u32, u32)) -> BookingDraft {
    BookingDraft {
        user_id: user.id,
        venue_id: venue.id,
        court,
        date: future_date(3),
        start_time: t(start.0, start.1),
        end_time: t(end.0, end.1),
        total_price: Decimal::new(2000, 2),
        offer_id: None,
        notes: None,
    }
}

// ============================================================================
// Migration Tests
// ============================================================================

#[sqlx::test]
async fn test_migrations_ran(pool: PgPool) {
    let tables = vec![
        "users", "venues", "branches", "bookings", "booking_statuses", "offers", "coaches", "packages",
        "matches", "match_requests", "products", "orders", "order_items", "chats", "messages",
        "notifications", "sponsors", "stories", "sports", "categories", "global_config",
    ];

    for table in tables {
        let exists: bool = sqlx::query(
            "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap()
        .get(0);
        assert!(exists, "Table {} should exist", table);
    }

    let db = TestDatabase::from_pool(pool).await;
    let labels = db.booking_repo.list_status_labels().await.unwrap();
    let codes: Vec<_> = labels.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["pending", "confirmed", "cancelled", "completed"]);
}

// ============================================================================
// User Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_user_email_is_unique_case_insensitively(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;

    let user = create_test_user(&db, "Ana@Example.com", UserRole::User).await;
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role_enum(), UserRole::User);

    let found = db.user_repo.find_by_email("ANA@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let duplicate = db
        .user_repo
        .create(&NewUser {
            name: "Other".into(),
            email: "ana@example.com".into(),
            phone: None,
            role: None,
            avatar_url: None,
            level: None,
        })
        .await;
    assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));
}

#[sqlx::test]
async fn test_user_partial_update(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "luis@example.com", UserRole::User).await;

    let updated = db
        .user_repo
        .update(
            user.id,
            &UpdateUser {
                phone: Some("+34 600 000 000".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, user.name);
    assert_eq!(updated.phone.as_deref(), Some("+34 600 000 000"));

    let promoted = db.user_repo.set_role(user.id, UserRole::Admin).await.unwrap();
    assert!(promoted.is_admin());

    let missing = db.user_repo.update(Uuid::new_v4(), &UpdateUser::default()).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
}

// ============================================================================
// Booking Conflict Tests
// ============================================================================

#[sqlx::test]
async fn test_overlapping_booking_rejected(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "p1@example.com", UserRole::User).await;
    let venue = create_test_venue(&db, 2).await;

    db.booking_repo
        .create_checked(&draft(&user, &venue, 1, (10, 0), (11, 0)))
        .await
        .expect("first booking should succeed");

    let partial = db
        .booking_repo
        .create_checked(&draft(&user, &venue, 1, (10, 30), (11, 30)))
        .await;
    assert!(matches!(partial, Err(RepositoryError::BusinessRule(_))));

    // New booking fully containing the existing one
    let containing = db
        .booking_repo
        .create_checked(&draft(&user, &venue, 1, (9, 30), (12, 0)))
        .await;
    assert!(matches!(containing, Err(RepositoryError::BusinessRule(_))));

    // New booking fully inside the existing one
    let inside = db
        .booking_repo
        .create_checked(&draft(&user, &venue, 1, (10, 0), (10, 30)))
        .await;
    assert!(matches!(inside, Err(RepositoryError::BusinessRule(_))));
}

#[sqlx::test]
async fn test_back_to_back_and_other_court_allowed(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "p2@example.com", UserRole::User).await;
    let venue = create_test_venue(&db, 2).await;

    db.booking_repo
        .create_checked(&draft(&user, &venue, 1, (10, 0), (11, 0)))
        .await
        .unwrap();

    db.booking_repo
        .create_checked(&draft(&user, &venue, 1, (11, 0), (12, 0)))
        .await
        .expect("booking starting when another ends should succeed");
    db.booking_repo
        .create_checked(&draft(&user, &venue, 1, (9, 0), (10, 0)))
        .await
        .expect("booking ending when another starts should succeed");
    db.booking_repo
        .create_checked(&draft(&user, &venue, 2, (10, 0), (11, 0)))
        .await
        .expect("same slot on a different court should succeed");

    let on_date = db
        .booking_repo
        .list_by_venue_and_date(venue.id, future_date(3))
        .await
        .unwrap();
    assert_eq!(on_date.len(), 4);
}

#[sqlx::test]
async fn test_cancelled_booking_frees_slot(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "p3@example.com", UserRole::User).await;
    let venue = create_test_venue(&db, 1).await;

    let booking = db
        .booking_repo
        .create_checked(&draft(&user, &venue, 1, (18, 0), (19, 30)))
        .await
        .unwrap();

    let cancelled = db
        .booking_repo
        .transition_status(booking.id, BookingStatus::Pending, BookingStatus::Cancelled)
        .await
        .unwrap()
        .expect("pending booking should cancel");
    assert_eq!(cancelled.status_enum(), BookingStatus::Cancelled);

    // A stale transition finds nothing to update
    let stale = db
        .booking_repo
        .transition_status(booking.id, BookingStatus::Pending, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert!(stale.is_none());

    let rebooked = db
        .booking_repo
        .create_checked(&draft(&user, &venue, 1, (18, 0), (19, 30)))
        .await
        .expect("cancelled booking should not block the slot");
    assert_eq!(rebooked.status_enum(), BookingStatus::Pending);

    let live = db
        .booking_repo
        .list_by_venue_and_date(venue.id, future_date(3))
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_bookings_equal(&live[0], &rebooked);
}

#[sqlx::test]
async fn test_concurrent_bookings_for_same_slot(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let a = create_test_user(&db, "a@example.com", UserRole::User).await;
    let b = create_test_user(&db, "b@example.com", UserRole::User).await;
    let venue = create_test_venue(&db, 1).await;

    let first = draft(&a, &venue, 1, (20, 0), (21, 0));
    let second = draft(&b, &venue, 1, (20, 30), (21, 30));
    let (r1, r2) = tokio::join!(
        db.booking_repo.create_checked(&first),
        db.booking_repo.create_checked(&second)
    );

    let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one of two overlapping bookings may win");
}

#[sqlx::test]
async fn test_booking_unknown_venue(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "p4@example.com", UserRole::User).await;
    let venue = create_test_venue(&db, 1).await;

    let mut missing = draft(&user, &venue, 1, (10, 0), (11, 0));
    missing.venue_id = Uuid::new_v4();
    let result = db.booking_repo.create_checked(&missing).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

// ============================================================================
// Offer Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_offer_lookup_by_code(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let venue = create_test_venue(&db, 1).await;

    let offer = db
        .offer_repo
        .create(&NewOffer {
            title: "Early bird".into(),
            code: "early20".into(),
            discount_percent: 20,
            venue_id: Some(venue.id),
            valid_from: future_date(0),
            valid_to: future_date(10),
        })
        .await
        .unwrap();
    assert_eq!(offer.code, "EARLY20");

    let found = db
        .offer_repo
        .find_active_by_code(" Early20 ", venue.id, future_date(3))
        .await
        .unwrap();
    assert_eq!(found.map(|o| o.id), Some(offer.id));

    let after_window = db
        .offer_repo
        .find_active_by_code("EARLY20", venue.id, future_date(11))
        .await
        .unwrap();
    assert!(after_window.is_none());

    let other_venue = db
        .offer_repo
        .find_active_by_code("EARLY20", Uuid::new_v4(), future_date(3))
        .await
        .unwrap();
    assert!(other_venue.is_none());
}

// ============================================================================
// Match Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_open_matches_filter_level_before_paging(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let creator = create_test_user(&db, "organiser@example.com", UserRole::User).await;

    for (days, min, max) in [(1, 10, 25), (2, 10, 25), (3, 50, 60)] {
        db.match_repo
            .create(
                creator.id,
                &NewMatch {
                    venue_id: None,
                    date: future_date(days),
                    start_time: t(19, 0),
                    level_min: Some(Decimal::new(min, 1)),
                    level_max: Some(Decimal::new(max, 1)),
                    max_players: None,
                    description: None,
                },
            )
            .await
            .unwrap();
    }

    let first_page = Pagination::new(2, 0);
    let all = db.match_repo.list_open(future_date(0), None, None, first_page).await.unwrap();
    assert_eq!(all.len(), 2);

    // The advanced match sorts last, so it must survive the LIMIT
    let advanced = db
        .match_repo
        .list_open(future_date(0), None, Some(Decimal::new(55, 1)), first_page)
        .await
        .unwrap();
    assert_eq!(advanced.len(), 1);
    assert_eq!(advanced[0].level_min, Decimal::new(50, 1));

    let edge = db
        .match_repo
        .list_open(future_date(0), None, Some(Decimal::new(25, 1)), first_page)
        .await
        .unwrap();
    assert_eq!(edge.len(), 2);
}

#[sqlx::test]
async fn test_match_never_exceeds_capacity(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let creator = create_test_user(&db, "creator@example.com", UserRole::User).await;
    let p1 = create_test_user(&db, "m1@example.com", UserRole::User).await;
    let p2 = create_test_user(&db, "m2@example.com", UserRole::User).await;

    let game = db
        .match_repo
        .create(
            creator.id,
            &NewMatch {
                venue_id: None,
                date: future_date(2),
                start_time: t(19, 0),
                level_min: None,
                level_max: None,
                max_players: Some(2),
                description: None,
            },
        )
        .await
        .unwrap();
    assert!(game.is_open());

    let r1 = db.match_repo.create_request(game.id, p1.id).await.unwrap();
    let r2 = db.match_repo.create_request(game.id, p2.id).await.unwrap();

    let duplicate = db.match_repo.create_request(game.id, p1.id).await;
    assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));

    let decision = db.match_repo.respond_request(r1.id, true).await.unwrap();
    assert_eq!(decision.request.status_enum(), RequestStatus::Accepted);
    assert_eq!(decision.game.status_enum(), MatchStatus::Full);

    let overflow = db.match_repo.respond_request(r2.id, true).await;
    assert!(matches!(overflow, Err(RepositoryError::BusinessRule(_))));

    // Rejecting is still possible once full
    let rejected = db.match_repo.respond_request(r2.id, false).await.unwrap();
    assert_eq!(rejected.request.status_enum(), RequestStatus::Rejected);

    assert_eq!(MatchRepository::count_accepted(&db.pool, game.id).await.unwrap(), 1);

    let again = db.match_repo.respond_request(r1.id, false).await;
    assert!(matches!(again, Err(RepositoryError::InvalidInput(_))));
}

// ============================================================================
// Store Tests
// ============================================================================

#[sqlx::test]
async fn test_order_reserves_and_restores_stock(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "shopper@example.com", UserRole::User).await;
    let balls = create_test_product(&db, "Balls x3", Decimal::new(650, 2), 10).await;
    let grip = create_test_product(&db, "Overgrip", Decimal::new(300, 2), 5).await;

    let placed = db
        .order_repo
        .place_order(
            user.id,
            &[
                OrderLine { product_id: balls.id, quantity: 2 },
                OrderLine { product_id: grip.id, quantity: 1 },
                OrderLine { product_id: balls.id, quantity: 1 },
            ],
        )
        .await
        .unwrap();

    assert_eq!(placed.items.len(), 2);
    assert_eq!(placed.order.total, Decimal::new(2250, 2));
    assert_eq!(placed.order.status_enum(), OrderStatus::Pending);

    let balls_after = db.product_repo.find_by_id(balls.id).await.unwrap().unwrap();
    assert_eq!(balls_after.stock, 7);

    let cancelled = db
        .order_repo
        .transition_status(placed.order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status_enum(), OrderStatus::Cancelled);

    let balls_restored = db.product_repo.find_by_id(balls.id).await.unwrap().unwrap();
    assert_eq!(balls_restored.stock, 10);

    let reopen = db.order_repo.transition_status(placed.order.id, OrderStatus::Paid).await;
    assert!(matches!(reopen, Err(RepositoryError::InvalidInput(_))));
}

#[sqlx::test]
async fn test_order_over_stock_changes_nothing(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "greedy@example.com", UserRole::User).await;
    let racket = create_test_product(&db, "Racket", Decimal::new(12000, 2), 3).await;
    let bag = create_test_product(&db, "Bag", Decimal::new(4500, 2), 1).await;

    let result = db
        .order_repo
        .place_order(
            user.id,
            &[
                OrderLine { product_id: racket.id, quantity: 1 },
                OrderLine { product_id: bag.id, quantity: 2 },
            ],
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::BusinessRule(_))));

    let racket_after = db.product_repo.find_by_id(racket.id).await.unwrap().unwrap();
    assert_eq!(racket_after.stock, 3);
    let orders = db.order_repo.list_by_user(user.id, Pagination::default()).await.unwrap();
    assert!(orders.is_empty());

    db.product_repo
        .update(
            racket.id,
            &UpdateProduct {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let inactive = db
        .order_repo
        .place_order(user.id, &[OrderLine { product_id: racket.id, quantity: 1 }])
        .await;
    assert!(matches!(inactive, Err(RepositoryError::InvalidInput(_))));
}

// ============================================================================
// Coach Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_coach_profile_sets_and_clears_role(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let user = create_test_user(&db, "coach@example.com", UserRole::User).await;

    let coach = db
        .coach_repo
        .create(&NewCoach {
            user_id: user.id,
            bio: Some("Ex pro".into()),
            hourly_rate: Decimal::new(4000, 2),
        })
        .await
        .unwrap();
    let promoted = db.user_repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(promoted.role_enum(), UserRole::Coach);

    let package = db
        .coach_repo
        .create_package(
            coach.id,
            &NewPackage {
                title: "Five sessions".into(),
                description: None,
                sessions: 5,
                price: Decimal::new(18000, 2),
                duration_days: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(package.duration_days, 30);

    db.coach_repo
        .update_package(
            package.id,
            &UpdatePackage {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(db.coach_repo.list_packages_by_coach(coach.id, true).await.unwrap().is_empty());
    assert_eq!(db.coach_repo.list_packages_by_coach(coach.id, false).await.unwrap().len(), 1);

    assert!(db.coach_repo.delete(coach.id).await.unwrap());
    let demoted = db.user_repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(demoted.role_enum(), UserRole::User);
    assert!(!db.coach_repo.delete(coach.id).await.unwrap());

    let orphan = db
        .coach_repo
        .create(&NewCoach {
            user_id: Uuid::new_v4(),
            bio: None,
            hourly_rate: Decimal::ONE,
        })
        .await;
    assert!(matches!(orphan, Err(RepositoryError::NotFound(_))));
}

// ============================================================================
// Chat and Notification Tests
// ============================================================================

#[sqlx::test]
async fn test_chat_pair_is_unordered(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let a = create_test_user(&db, "chat-a@example.com", UserRole::User).await;
    let b = create_test_user(&db, "chat-b@example.com", UserRole::User).await;

    let chat = db.chat_repo.find_or_create(a.id, b.id).await.unwrap();
    let same = db.chat_repo.find_or_create(b.id, a.id).await.unwrap();
    assert_eq!(chat.id, same.id);

    db.chat_repo.send_message(chat.id, a.id, "hola").await.unwrap();
    db.chat_repo.send_message(chat.id, a.id, "¿jugamos?").await.unwrap();
    db.chat_repo.send_message(chat.id, b.id, "vale").await.unwrap();

    let page = db.chat_repo.list_messages(chat.id, None, 2).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].created_at >= page[1].created_at);

    let older = db
        .chat_repo
        .list_messages(chat.id, Some(page[1].created_at), 10)
        .await
        .unwrap();
    assert!(older.iter().all(|m| m.created_at < page[1].created_at));

    assert_eq!(db.chat_repo.mark_read(chat.id, b.id).await.unwrap(), 2);
    assert_eq!(db.chat_repo.mark_read(chat.id, b.id).await.unwrap(), 0);

    assert_eq!(db.chat_repo.list_for_user(a.id).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn test_notification_read_is_owner_only(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let owner = create_test_user(&db, "owner@example.com", UserRole::User).await;
    let other = create_test_user(&db, "other@example.com", UserRole::User).await;

    let n = db
        .notification_repo
        .create(owner.id, NotificationKind::Booking, "Booking received", "Court 1")
        .await
        .unwrap();
    db.notification_repo
        .create(owner.id, NotificationKind::System, "Welcome", "Hi")
        .await
        .unwrap();

    assert!(db.notification_repo.mark_read(n.id, other.id).await.unwrap().is_none());
    let read = db.notification_repo.mark_read(n.id, owner.id).await.unwrap().unwrap();
    assert!(read.is_read());

    let unread = db
        .notification_repo
        .list_for_user(owner.id, true, Pagination::default())
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);

    assert_eq!(db.notification_repo.mark_all_read(owner.id).await.unwrap(), 1);
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[sqlx::test]
async fn test_catalog_ordering_and_config_upsert(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;

    for (name, priority) in [("Low", 1), ("High", 10), ("Mid", 5)] {
        db.catalog_repo
            .create_sponsor(&NewSponsor {
                name: name.into(),
                logo_url: None,
                website_url: None,
                priority: Some(priority),
            })
            .await
            .unwrap();
    }
    let sponsors = db.catalog_repo.list_sponsors(true).await.unwrap();
    let names: Vec<_> = sponsors.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["High", "Mid", "Low"]);

    let sport = NewSport {
        name: "Padel".into(),
        icon_url: None,
    };
    db.catalog_repo.create_sport(&sport).await.unwrap();
    let duplicate = db.catalog_repo.create_sport(&sport).await;
    assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));

    db.catalog_repo
        .set_config("support_email", &serde_json::json!("help@example.com"))
        .await
        .unwrap();
    let replaced = db
        .catalog_repo
        .set_config("support_email", &serde_json::json!("soporte@example.com"))
        .await
        .unwrap();
    assert_eq!(replaced.value, serde_json::json!("soporte@example.com"));
    assert_eq!(db.catalog_repo.list_config().await.unwrap().len(), 1);
    assert!(db.catalog_repo.delete_config("support_email").await.unwrap());
    assert!(db.catalog_repo.get_config("support_email").await.unwrap().is_none());

    db.cleanup().await;
    assert!(db.catalog_repo.list_sponsors(false).await.unwrap().is_empty());
}
