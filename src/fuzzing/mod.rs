//! Module for testing using fuzzing (quickcheck)
#![allow(clippy::type_complexity)]

use std::fmt::Debug;

use crate::*;
use quickcheck::Arbitrary;

mod basic;

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 10000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    // sample all inputs
    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        let success = f(input_c);
        if !success {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        let success = f(i_c);
        if !success {
            shrink_failure(f, i)
        }
    }
    // all shrunken inputs pass, so `input` is the minimal failing one
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

/// Reference longest-prefix match: the longest of `prefixes` that contains `query`.
fn brute_force_lpm<'a, P: Prefix + 'a, T>(
    prefixes: impl IntoIterator<Item = (&'a P, &'a T)>,
    query: &P,
) -> Option<(&'a P, &'a T)> {
    prefixes
        .into_iter()
        .filter(|(p, _)| p.contains(query))
        .max_by_key(|(p, _)| p.prefix_len())
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(u32, u8);

impl TestPrefix {
    fn host(addr: u32) -> Self {
        TestPrefix(addr, 32)
    }

    fn to_ipv4(self) -> ipnet::Ipv4Net {
        Prefix::from_repr_len(self.0, self.1)
    }
}

impl Debug for TestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let addr = format!("{:032b}", self.0)[..12].to_string();
        write!(f, "0b{addr}/{}", self.1)
    }
}

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // mostly short prefixes, so that random prefixes overlap and split each other, plus a few
        // of the lengths seen in real registries
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
                12, 16, 24, 32,
            ])
            .unwrap();
        let x = u32::arbitrary(g);
        Self::from_repr_len(x, len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            let len = self.1 - 1;
            let x = Self::from_repr_len(self.0, len);
            quickcheck::single_shrinker(x)
        }
    }
}

impl Prefix for TestPrefix {
    type R = u32;

    fn repr(&self) -> Self::R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }

    fn from_repr_len(repr: Self::R, len: u8) -> Self {
        let x = Prefix::mask(&(repr, len));
        Self(x, len)
    }
}

/// 128-bit prefixes. Random addresses of that width almost never overlap, so most of them share
/// a common leading pattern of random length, making them diverge at arbitrary bit positions.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct WideTestPrefix(u128, u8);

const WIDE_PATTERN: u128 = 0x2001_0db8_85a3_0000_0000_8a2e_0370_7334;

impl Debug for WideTestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#034x}/{}", self.0, self.1)
    }
}

impl Arbitrary for WideTestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let shared: u32 = *g.choose(&[0, 8, 16, 32, 48, 64, 80, 96, 112, 120]).unwrap();
        let free = u128::MAX >> shared;
        let x = (WIDE_PATTERN & !free) | (u128::arbitrary(g) & free);
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0, 1, 2, 3, 4, 5, 6, 7, 8,
                16, 24, 32, 33, 40, 48, 56, 63, 64, 65,
                72, 80, 88, 96, 100, 104, 112, 116, 120, 124, 127, 128,
            ])
            .unwrap();
        let len = len.max((shared as u8).saturating_sub(4)).min(128);
        Self::from_repr_len(x, len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            let len = self.1 - 1;
            let x = Self::from_repr_len(self.0, len);
            quickcheck::single_shrinker(x)
        }
    }
}

impl Prefix for WideTestPrefix {
    type R = u128;

    fn repr(&self) -> Self::R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }

    fn from_repr_len(repr: Self::R, len: u8) -> Self {
        let x = Prefix::mask(&(repr, len));
        Self(x, len)
    }
}
