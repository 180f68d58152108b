//! Arbitrary implementations for the terms of the symbol table.

use proptest::{
    prelude::{Arbitrary, BoxedStrategy, Just, Strategy},
    prop_oneof,
};

use crate::{
    constant::ConstantValue,
    ty::{Primitive, Type},
};

impl Arbitrary for Primitive {
    type Strategy = BoxedStrategy<Self>;
    type Parameters = ();

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        prop_oneof![Just(Self::Int), Just(Self::Char)].boxed()
    }
}

impl Arbitrary for Type {
    type Strategy = BoxedStrategy<Self>;
    type Parameters = ();

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        Primitive::arbitrary()
            .prop_map(Self::Primitive)
            .prop_recursive(8, 24, 1, |element| {
                (1..=16u32, element).prop_map(|(length, element)| {
                    Self::array(length, element)
                })
            })
            .boxed()
    }
}

impl Arbitrary for ConstantValue {
    type Strategy = BoxedStrategy<Self>;
    type Parameters = ();

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        prop_oneof![
            proptest::num::i32::ANY.prop_map(Self::Int),
            proptest::char::any().prop_map(Self::Char),
        ]
        .boxed()
    }
}
