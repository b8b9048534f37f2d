//! Deterministic property names
//!
//! Names are "Adjective Noun" pairs. The mapping from index to pair is a
//! bijection over one cycle of `ADJECTIVES.len() * NOUNS.len()` names; later
//! cycles get a numeric suffix, so every index yields a distinct name.

const ADJECTIVES: [&str; 24] = [
    "Amber", "Brisk", "Cobalt", "Dusty", "Emerald", "Frosty", "Golden", "Hidden", "Ivory",
    "Jolly", "Lucky", "Misty", "Noble", "Olive", "Quiet", "Rusty", "Silver", "Sunny", "Velvet",
    "Windy", "Crimson", "Royal", "Shady", "Twin",
];

const NOUNS: [&str; 24] = [
    "Avenue", "Lane", "Square", "Harbour", "Ridge", "Meadow", "Bungalow", "Cottage", "Villa",
    "Manor", "Tower", "Arcade", "Pavilion", "Terrace", "Plaza", "Boulevard", "Canyon", "Delta",
    "Grove", "Burger Bar", "Diner", "Bakery", "Market", "Wharf",
];

/// Name of the `index`-th property on a board
pub fn property_name(index: usize) -> String {
    let cycle_len = ADJECTIVES.len() * NOUNS.len();
    let within = index % cycle_len;
    let cycle = index / cycle_len;

    // gcd(NOUNS.len() + 1, ADJECTIVES.len()) == 1 keeps this a bijection
    let noun = within % NOUNS.len();
    let adjective = (within / NOUNS.len() + within) % ADJECTIVES.len();

    let name = format!("{} {}", ADJECTIVES[adjective], NOUNS[noun]);
    if cycle == 0 {
        name
    } else {
        format!("{name} {}", cycle + 1)
    }
}
