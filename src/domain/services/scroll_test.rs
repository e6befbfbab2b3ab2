use super::Scroll;

fn scroll(list_length: u16, viewport_length: u16) -> Scroll {
    let mut scroll = Scroll::default();
    scroll.set_state(list_length, viewport_length);
    return scroll;
}

#[test]
fn it_stays_put_when_everything_fits() {
    let mut scroll = scroll(5, 20);

    scroll.down();
    scroll.down_page();
    scroll.last();

    assert_eq!(scroll.position, 0);
}

#[test]
fn it_clamps_to_the_last_page() {
    let mut scroll = scroll(50, 20);

    scroll.down_page();
    scroll.down_page();
    scroll.down_page();
    scroll.down_page();

    assert_eq!(scroll.position, 30);
}

#[test]
fn it_never_goes_above_the_top() {
    let mut scroll = scroll(50, 20);

    scroll.down();
    scroll.up();
    scroll.up();
    scroll.up_page();

    assert_eq!(scroll.position, 0);
}

#[test]
fn it_jumps_to_the_end() {
    let mut scroll = scroll(50, 20);

    scroll.last();

    assert_eq!(scroll.position, 30);
}

#[test]
fn it_reclamps_when_the_list_shrinks() {
    let mut scroll = scroll(50, 20);
    scroll.last();

    scroll.set_state(25, 20);

    assert_eq!(scroll.position, 5);
}
