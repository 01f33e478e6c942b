use super::*;
use crate::foundation::error::StyleError;

fn fps() -> Fps {
    Fps::new(24, 1).unwrap()
}

#[test]
fn synthetic_source_yields_declared_count_then_stops() {
    let mut src = SyntheticSource::solid(FrameSize::new(4, 3), fps(), 3, [9, 8, 7]);
    let got: Vec<_> = frames(&mut src).collect::<Result<_, _>>().unwrap();
    assert_eq!(got.len(), 3);
    assert!(got.iter().all(|f| f.width == 4 && f.height == 3));
    assert_eq!(got[2].pixel(3, 2), [9, 8, 7]);
    assert!(src.next_frame().unwrap().is_none());
}

#[test]
fn generator_sees_frame_indices_in_order() {
    let info = SourceInfo {
        size: FrameSize::new(1, 1),
        fps: fps(),
        frame_count: 4,
    };
    let mut src = SyntheticSource::new(info, |i| Ok(Frame::solid(1, 1, [i as u8, 0, 0])));
    let reds: Vec<u8> = frames(&mut src).map(|f| f.unwrap().pixel(0, 0)[0]).collect();
    assert_eq!(reds, vec![0, 1, 2, 3]);
}

#[test]
fn iterator_stops_after_first_error() {
    let info = SourceInfo {
        size: FrameSize::new(1, 1),
        fps: fps(),
        frame_count: 5,
    };
    let mut src = SyntheticSource::new(info, |i| {
        if i == 1 {
            Err(StyleError::invalid_source("corrupt packet"))
        } else {
            Ok(Frame::new(1, 1))
        }
    });
    let items: Vec<_> = frames(&mut src).collect();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(items[1], Err(StyleError::InvalidSource(_))));
}
