use crate::recover::{Cached, WasteCache};
use crate::{Input, Recoverer, State, Waste, waste_to};

fn waste(recoverer: Recoverer, state: &State) -> Waste {
    let Recoverer::Fast(f) = recoverer else {
        panic!("expected a fast recoverer");
    };
    f(state)
}

#[test]
fn find_counts_scalars() {
    let state = State::new(Input::text("héllo"));

    assert_eq!(waste(Recoverer::find(|c| c == 'l'), &state), Waste::Units(2));
    assert_eq!(waste(Recoverer::find(|c| c == 'h'), &state), Waste::Units(0));
    assert_eq!(waste(Recoverer::find(|c| c == 'z'), &state), Waste::TooMuch);
}

#[test]
fn find_str_counts_scalars() {
    let state = State::new(Input::text("héllo"));

    assert_eq!(waste(Recoverer::find_str("lo"), &state), Waste::Units(3));
    assert_eq!(waste(Recoverer::find_str("lol"), &state), Waste::TooMuch);
}

#[test]
fn find_byte_counts_bytes() {
    let state = State::new(Input::binary(vec![0xc3, 0xa9, 0x00]));

    assert_eq!(waste(Recoverer::find_byte(|b| b == 0), &state), Waste::Units(2));
}

#[test]
fn never_recoverer() {
    let state = State::new(Input::text("abc"));

    assert_eq!(waste(Recoverer::never(), &state), Waste::Never);
    assert!(Recoverer::never().is_fast());
    assert!(!Recoverer::Step.is_fast());
    assert_eq!(format!("{:?}", Recoverer::Step), "Step");
}

#[test]
fn waste_to_converts_bytes_to_units() {
    let state = State::new(Input::text("héllo"));

    assert_eq!(waste_to(&state, 3), Waste::Units(2));
    assert_eq!(waste_to(&state.move_by(1), 2), Waste::Units(1));
}

#[test]
fn cache_answers_until_the_anchor() {
    let mut cache = WasteCache::default();
    cache.insert(1, 5, Cached::Anchor(9));

    assert_eq!(cache.get(1, 5), Some(Cached::Anchor(9)));
    assert_eq!(cache.get(1, 7), Some(Cached::Anchor(9)));
    assert_eq!(cache.get(1, 9), Some(Cached::Anchor(9)));
    assert_eq!(cache.get(1, 10), None);
    assert_eq!(cache.get(1, 4), None);
    assert_eq!(cache.get(2, 5), None);
}

#[test]
fn cache_too_much_holds_for_later_positions() {
    let mut cache = WasteCache::default();
    cache.insert(1, 5, Cached::Anchor(9));
    cache.insert(1, 12, Cached::TooMuch);

    assert_eq!(cache.get(1, 12), Some(Cached::TooMuch));
    assert_eq!(cache.get(1, 40), Some(Cached::TooMuch));
    assert_eq!(cache.get(1, 8), Some(Cached::Anchor(9)));
    assert_eq!(cache.len(), 2);
}
