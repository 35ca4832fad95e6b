use playcache::player::Player;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut player = Player::new();
    player.add_track("Shape of You", "Ed Sheeran", 235);
    player.add_track("Uptown Funk", "Mark Ronson ft. Bruno Mars", 270);
    player.add_track("Bohemian Rhapsody", "Queen", 354);

    player.play_current();
    player.play_current();

    // Tracks are not chained together, so navigation stays on the first one.
    player.play_next();

    println!("Top favourites:");
    for (id, plays, frequency) in player.top_tracks(10) {
        if let Some(track) = player.track(id) {
            println!("  {track} - {plays} plays (touched {frequency}x)");
        }
    }
}

// Expected output (tracing lines elided):
//   Top favourites:
//     Shape of You by Ed Sheeran - 2 plays (touched 3x)
//     Bohemian Rhapsody by Queen - 0 plays (touched 1x)
//     Uptown Funk by Mark Ronson ft. Bruno Mars - 0 plays (touched 1x)
