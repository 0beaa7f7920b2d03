use mahjong_tai::claims::{can_pong, chow_options};
use mahjong_tai::{Exposed, Hand, Tile, score, winning_tiles};

fn print_hand(label: &str, hand: &Hand) {
    let tiles: Vec<String> = hand.tiles().iter().map(|t| t.to_string()).collect();
    println!("{}: {}", label, tiles.join(" "));
}

fn main() {
    println!("Mahjong Hand Scoring\n");

    // A waiting hand: 123 456 789 of the suit, a triplet of east, a lone red dragon
    let mut hand = Hand::new();
    for rank in 1..=9 {
        hand.add(Tile::numbered(rank));
    }
    for _ in 0..3 {
        hand.add(Tile::EAST);
    }
    hand.add(Tile::RED);
    print_hand("Concealed", &hand);

    let waits = winning_tiles(&hand, &Exposed::new());
    let names: Vec<String> = waits.iter().map(|t| t.to_string()).collect();
    println!("Waiting on: {}", names.join(", "));

    // Opponent discards a five: what could be claimed?
    let discard = Tile::numbered(5);
    println!("\nDiscard {}:", discard);
    println!("  pong: {}", can_pong(&hand, discard));
    for option in chow_options(&hand, discard) {
        let tiles: Vec<String> = option.iter().map(|t| t.to_string()).collect();
        println!("  chow: {}", tiles.join(" "));
    }

    // Draw the red dragon ourselves on the last tile of the wall
    hand.add(Tile::RED);
    print_hand("\nCompleted", &hand);

    let record = score(&Exposed::new(), &hand, true, 0);
    if record.is_winning() {
        println!("Patterns: {}", record.names().join(", "));
        let bonuses: Vec<String> = record.bonuses.iter().map(|b| format!("{:?}", b)).collect();
        println!("Bonuses: {}", bonuses.join(", "));
        println!("Total: {}", record.total);
    } else {
        println!("Not a winning hand.");
    }

    // The same engine through the string protocol, with an exposed meld
    match mahjong_tai::score_encoded("m,m,m", "b,b,b,f,f,one,one,one,two,three,four", false, 12) {
        Ok(record) => println!("\nExposed red triplet: {:?} = {}", record.names(), record.total),
        Err(e) => println!("\nError: {}", e),
    }
}
