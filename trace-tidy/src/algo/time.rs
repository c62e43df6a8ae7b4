use crate::algo::PointInTime;

pub trait SortChronologically {
    /// stable, so samples sharing a timestamp keep their recorded order
    fn sort_chronologically(&mut self);

    fn is_chronological(&self) -> bool;
}

impl<PIT> SortChronologically for [PIT]
where
    PIT: PointInTime,
{
    fn sort_chronologically(&mut self) {
        self.sort_by_key(|pit| pit.timestamp())
    }

    fn is_chronological(&self) -> bool {
        self.windows(2)
            .all(|window| window[0].timestamp() <= window[1].timestamp())
    }
}
