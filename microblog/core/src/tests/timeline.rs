use std::time::Duration;

use chrono::Utc;
use common::database::Ulid;

use super::{harness, harness_with};
use crate::database::{Fault, MemoryDatabase, PostStore};
use crate::{DefaultBefore, Error, Options, PageLimit, Post};

fn contents(posts: &[Post]) -> Vec<&str> {
	posts.iter().map(|post| post.content.as_str()).collect()
}

#[tokio::test]
async fn test_timeline_newest_first() {
	let h = harness();
	let a = h.user("alice").await;
	let b = h.user("bob").await;

	h.microblog.create_post(b.id, "hello").await.expect("failed to post");
	let world = h.microblog.create_post(b.id, "world").await.expect("failed to post");
	h.microblog.follow(a.id, b.id).await.expect("failed to follow");

	let before = world.created_at + chrono::Duration::seconds(1);
	let posts = h
		.microblog
		.get_timeline(a.id, PageLimit::new(10).unwrap(), Some(before))
		.await
		.expect("failed to get timeline");

	assert_eq!(contents(&posts), ["world", "hello"]);
}

#[tokio::test]
async fn test_timeline_limit_and_cursor() {
	let h = harness();
	let a = h.user("alice").await;
	let b = h.user("bob").await;
	let c = h.user("carol").await;
	let stranger = h.user("dave").await;

	h.microblog.follow(a.id, b.id).await.unwrap();
	h.microblog.follow(a.id, c.id).await.unwrap();

	// one second apart so the cursor splits the page at a known place
	let base = Utc::now() - chrono::Duration::hours(1);
	let mut posts = Vec::new();
	for i in 0..6 {
		let author = if i % 2 == 0 { &b } else { &c };
		let at = base + chrono::Duration::seconds(i);
		let post = Post {
			id: Ulid::new(),
			user_id: author.id,
			content: format!("post {i}"),
			created_at: at,
			updated_at: at,
		};
		h.db.insert_post(&post).await.expect("failed to insert post");
		posts.push(post);
	}
	h.microblog.create_post(stranger.id, "not followed").await.unwrap();

	let cursor = posts[4].created_at;
	let page = h
		.microblog
		.get_timeline(a.id, PageLimit::new(2).unwrap(), Some(cursor))
		.await
		.expect("failed to get timeline");

	assert_eq!(page, [posts[3].clone(), posts[2].clone()]);

	let everything = h
		.microblog
		.get_timeline(a.id, PageLimit::default(), Some(Utc::now() + chrono::Duration::seconds(1)))
		.await
		.expect("failed to get timeline");
	assert_eq!(everything.len(), 6);
	assert_eq!(everything[0].id, posts[5].id);
}

#[tokio::test]
async fn test_unfollow_hides_posts() {
	let h = harness();
	let a = h.user("alice").await;
	let b = h.user("bob").await;

	h.microblog.follow(a.id, b.id).await.unwrap();
	h.microblog.create_post(b.id, "seen").await.unwrap();
	h.microblog.unfollow(a.id, b.id).await.unwrap();
	h.microblog.create_post(b.id, "after unfollow").await.unwrap();

	let posts = h
		.microblog
		.get_timeline(a.id, PageLimit::default(), Some(Utc::now() + chrono::Duration::seconds(1)))
		.await
		.expect("failed to get timeline");
	assert!(posts.is_empty());
}

#[tokio::test]
async fn test_timeline_following_nobody() {
	let h = harness();
	let a = h.user("alice").await;

	let posts = h
		.microblog
		.get_timeline(a.id, PageLimit::default(), None)
		.await
		.expect("failed to get timeline");
	assert!(posts.is_empty());
}

#[tokio::test]
async fn test_timeline_tolerates_deleted_author() {
	let h = harness();
	let a = h.user("alice").await;
	let b = h.user("bob").await;

	h.microblog.follow(a.id, b.id).await.unwrap();
	h.microblog.create_post(b.id, "orphan").await.unwrap();
	h.microblog.delete_user(b.id).await.unwrap();

	let posts = h
		.microblog
		.get_timeline(a.id, PageLimit::default(), Some(Utc::now() + chrono::Duration::seconds(1)))
		.await
		.expect("failed to get timeline");
	assert_eq!(contents(&posts), ["orphan"]);
}

#[tokio::test]
async fn test_default_before_policy() {
	let h = harness_with(
		MemoryDatabase::new(),
		Options {
			default_before: DefaultBefore::Ago(Duration::from_secs(3 * 24 * 60 * 60)),
			..Default::default()
		},
	);
	let a = h.user("alice").await;
	let b = h.user("bob").await;

	h.microblog.follow(a.id, b.id).await.unwrap();
	h.microblog.create_post(b.id, "too recent").await.unwrap();

	let posts = h
		.microblog
		.get_timeline(a.id, PageLimit::default(), None)
		.await
		.expect("failed to get timeline");
	assert!(posts.is_empty());
}

#[tokio::test]
async fn test_timeline_unavailable() {
	let h = harness();
	let a = h.user("alice").await;

	h.db.fail(Fault::Timeline);
	let err = h
		.microblog
		.get_timeline(a.id, PageLimit::default(), None)
		.await
		.expect_err("timeline should fail");
	assert!(matches!(err, Error::TimelineUnavailable(_)));
}

#[test]
fn test_page_limit() {
	assert_eq!(PageLimit::parse_or_default(None).get(), 50);
	assert_eq!(PageLimit::parse_or_default(Some("0")).get(), 50);
	assert_eq!(PageLimit::parse_or_default(Some("101")).get(), 50);
	assert_eq!(PageLimit::parse_or_default(Some("abc")).get(), 50);
	assert_eq!(PageLimit::parse_or_default(Some("-3")).get(), 50);
	assert_eq!(PageLimit::parse_or_default(Some("1")).get(), 1);
	assert_eq!(PageLimit::parse_or_default(Some(" 100 ")).get(), 100);
	assert!(PageLimit::new(0).is_none());
}

#[test]
fn test_default_before_parse() {
	assert_eq!("now".parse::<DefaultBefore>().unwrap(), DefaultBefore::Now);
	assert_eq!(
		"3days".parse::<DefaultBefore>().unwrap(),
		DefaultBefore::Ago(Duration::from_secs(3 * 24 * 60 * 60))
	);
	assert!("yesterday-ish".parse::<DefaultBefore>().is_err());

	let now = Utc::now();
	assert_eq!(DefaultBefore::Now.resolve(now), now);
	assert_eq!(
		DefaultBefore::Ago(Duration::from_secs(60)).resolve(now),
		now - chrono::Duration::seconds(60)
	);

	let parsed: DefaultBefore = serde_json::from_str("\"1h\"").expect("failed to deserialize");
	assert_eq!(parsed, DefaultBefore::Ago(Duration::from_secs(3600)));
}
