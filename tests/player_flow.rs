// ==============================================
// PLAYER FLOW TESTS (integration)
// ==============================================
//
// The player is plumbing over the cache: these tests pin the contract
// between them — tallies are the cached values, the cache's frequency is
// the ranking key, and the cursor only moves along explicit links.

use playcache::player::Player;

#[test]
fn plays_feed_both_rankings() {
    let mut player = Player::new();
    let first = player.add_track("Shape of You", "Ed Sheeran", 235);
    let second = player.add_track("Uptown Funk", "Mark Ronson ft. Bruno Mars", 270);
    player.add_track("Bohemian Rhapsody", "Queen", 354);

    for _ in 0..3 {
        player.play_current();
    }

    assert_eq!(player.play_count(first), 3);
    assert_eq!(player.play_count(second), 0);

    // Cache view: first has 1 insert + 3 play re-submits.
    let top = player.top_tracks(2);
    assert_eq!(top[0], (first, 3, 4));

    // Heap view ranks by plays alone.
    assert_eq!(player.ranked_by_plays(2), vec![(first, 3)]);
}

#[test]
fn cursor_stays_put_without_links() {
    let mut player = Player::new();
    let first = player.add_track("One", "A", 100);
    player.add_track("Two", "B", 100);
    player.add_track("Three", "C", 100);

    assert_eq!(player.current_track(), Some(first));
    assert_eq!(player.play_next(), None);
    assert_eq!(player.play_next(), None);
    assert_eq!(player.play_previous(), None);
    assert_eq!(player.current_track(), Some(first));

    // Failed navigation must not count as a play.
    assert_eq!(player.play_count(first), 0);
}

#[test]
fn title_lookup_finds_tracks() {
    let mut player = Player::new();
    player.add_track("One", "A", 100);
    let two = player.add_track("Two", "B", 100);

    assert_eq!(player.track_by_title("Two"), Some(two));
    assert_eq!(player.track_by_title("Nope"), None);
    assert_eq!(player.track(two).map(|t| t.title.as_str()), Some("Two"));
}

#[test]
fn small_favourites_capacity_evicts_cold_tracks() {
    let mut player = Player::with_favourites_capacity(2);
    let a = player.add_track("A", "x", 1);
    let b = player.add_track("B", "x", 1);
    let c = player.add_track("C", "x", 1);

    // Capacity 2: adding C evicted the coldest favourite, A.
    let favourites: Vec<_> = player.top_tracks(10).iter().map(|&(id, _, _)| id).collect();
    assert_eq!(favourites.len(), 2);
    assert!(!favourites.contains(&a));
    assert!(favourites.contains(&b));
    assert!(favourites.contains(&c));

    // The catalog and tallies keep every track regardless of the cache.
    assert_eq!(player.track_count(), 3);
    assert_eq!(player.play_count(a), 0);
}

#[test]
fn replays_promote_within_the_cache() {
    let mut player = Player::with_favourites_capacity(2);
    let a = player.add_track("A", "x", 1);
    player.add_track("B", "x", 1);

    // Cursor sits on A; replays push its frequency well above B's.
    player.play_current();
    player.play_current();

    let c = player.add_track("C", "x", 1); // evicts B, the cold one
    let top = player.top_tracks(10);
    assert_eq!(top[0].0, a);
    assert_eq!(top[0].1, 2);
    assert!(top.iter().any(|&(id, _, _)| id == c));
    assert_eq!(top.len(), 2);
}
