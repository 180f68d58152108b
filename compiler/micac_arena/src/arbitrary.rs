//! Arbitrary implementations for [`ID`] and [`Arena`].

use proptest::{
    num::u64,
    prelude::{Arbitrary, BoxedStrategy, Strategy},
};

use crate::{Arena, ID};

impl<T: 'static> Arbitrary for ID<T> {
    type Strategy = BoxedStrategy<Self>;
    type Parameters = ();

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        u64::ANY.prop_map(Self::new).boxed()
    }
}

impl<T: Arbitrary + 'static> Arbitrary for Arena<T> {
    type Strategy = BoxedStrategy<Self>;
    type Parameters = ();

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        proptest::collection::vec(T::arbitrary(), 0..=8)
            .prop_map(|items| {
                let mut arena = Self::new();
                for item in items {
                    arena.insert(item);
                }

                arena
            })
            .boxed()
    }
}
