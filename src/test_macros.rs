macro_rules! test_bilinear_group {
    ($backend: ident) => {
        use super::*;

        fn setup_group(bits: u32) -> $backend {
            let mut rng = rand::thread_rng();
            let config = crate::config::SetupConfig::with_security_bits(bits);
            let params = crate::params::generate(&config, &mut rng).unwrap();

            <$backend as BilinearGroup>::init(&params).unwrap()
        }

        fn random_non_identity(group: &$backend) -> <$backend as BilinearGroup>::G1 {
            let mut rng = rand::thread_rng();
            loop {
                let p = group.random_g1(&mut rng);
                if !group.is_g1_identity(&p) {
                    return p;
                }
            }
        }

        fn random_scalar(group: &$backend) -> Scalar {
            let mut rng = rand::thread_rng();
            num_bigint::RandBigInt::gen_biguint_below(&mut rng, group.order())
        }

        #[test]
        fn order_annihilates_g1() {
            let group = setup_group(10);
            let p = random_non_identity(&group);

            assert!(group.is_g1_identity(&group.g1_mul(&p, group.order())));
            assert!(!group.is_g1_identity(&group.g1_mul(&p, &Scalar::from(2u32))));
        }

        #[test]
        fn addition_agrees_with_scalar_multiplication() {
            let group = setup_group(20);
            let p = random_non_identity(&group);

            let two_p = group.g1_add(&p, &p);
            let three_p = group.g1_add(&two_p, &p);

            assert_eq!(two_p, group.g1_mul(&p, &Scalar::from(2u32)));
            assert_eq!(three_p, group.g1_mul(&p, &Scalar::from(3u32)));
            assert!(group.is_g1_identity(&group.g1_add(&p, &group.g1_neg(&p))));
        }

        #[test]
        fn bilinear_for_random_scalars() {
            for &bits in [10u32, 48].iter() {
                let group = setup_group(bits);
                let p = random_non_identity(&group);
                let q = random_non_identity(&group);
                let a = random_scalar(&group);
                let b = random_scalar(&group);

                let lhs = group.pair(&group.g1_mul(&p, &a), &group.g1_mul(&q, &b));
                let rhs = group.gt_pow(&group.pair(&p, &q), &(&a * &b));

                assert_eq!(group.gt_to_bytes(&lhs), group.gt_to_bytes(&rhs));
            }
        }

        #[test]
        fn linear_in_first_argument() {
            let group = setup_group(32);
            let p1 = random_non_identity(&group);
            let p2 = random_non_identity(&group);
            let q = random_non_identity(&group);

            let lhs = group.pair(&group.g1_add(&p1, &p2), &q);
            let rhs = group.gt_mul(&group.pair(&p1, &q), &group.pair(&p2, &q));

            assert_eq!(lhs, rhs);
        }

        #[test]
        fn non_degenerate() {
            let group = setup_group(10);
            let p = random_non_identity(&group);
            let epp = group.pair(&p, &p);

            assert_ne!(epp, group.gt_identity());
            assert_eq!(group.gt_pow(&epp, group.order()), group.gt_identity());
        }

        #[test]
        fn identity_pairs_to_one() {
            let group = setup_group(10);
            let p = random_non_identity(&group);
            let o = group.g1_identity();

            assert_eq!(group.pair(&o, &p), group.gt_identity());
            assert_eq!(group.pair(&p, &o), group.gt_identity());
        }

        #[test]
        fn g1_bytes_decode_back() {
            let group = setup_group(32);
            let p = random_non_identity(&group);
            let o = group.g1_identity();

            assert_eq!(group.g1_from_bytes(&group.g1_to_bytes(&p)), Some(p.clone()));
            assert_eq!(group.g1_from_bytes(&group.g1_to_bytes(&o)), Some(o));
            assert_eq!(group.g1_from_bytes(&[1u8, 2, 3]), None);
        }
    };
}
