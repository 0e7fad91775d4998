//! Node handle tests against the in-process mock library

#[cfg(test)]
mod tests {
    use crate::core::error::FastNoiseError;
    use crate::core::simd::SimdLevel;
    use crate::noise::node::{FastNoise, MemberValue};
    use crate::noise::output::OutputMinMax;
    use crate::noise::tests::mock_native::{
        AUTO_SIMD_LEVEL, is_deleted, mock_library, mock_library_with_simd, simplex_at,
    };
    use anyhow::Result;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_create_by_any_name_form() -> Result<()> {
        let library = mock_library();
        for name in ["Fractal FBm", "fractalfbm", "FractalFBm", " fractal fbm "] {
            let node = library.new_node(name)?;
            assert_eq!(node.metadata_id(), 2, "{}", name);
            assert_eq!(node.metadata_name(), "fractalfbm");
        }

        match library.new_node("Perlin") {
            Err(FastNoiseError::UnknownNode(name)) => assert_eq!(name, "Perlin"),
            other => panic!("expected UnknownNode, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_simd_level_follows_library() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;
        assert_eq!(node.simd_level(), Some(AUTO_SIMD_LEVEL), "Auto lets the native side choose");

        let node = mock_library_with_simd(SimdLevel::Avx2).new_node("Simplex")?;
        assert_eq!(node.simd_level_bits(), SimdLevel::Avx2.bits());
        assert_eq!(node.simd_level(), Some(SimdLevel::Avx2));
        Ok(())
    }

    #[test]
    fn test_drop_releases_native_reference() -> Result<()> {
        let library = mock_library();
        let node = library.new_node("Constant")?;
        let raw = node.raw();
        assert!(!is_deleted(raw));

        drop(node);
        assert!(is_deleted(raw));
        Ok(())
    }

    #[test]
    fn test_child_dropped_before_parent() -> Result<()> {
        let library = mock_library();
        let mut fractal = library.new_node("Fractal FBm")?;
        {
            let mut constant = library.new_node("Constant")?;
            constant.set_float("Value", 2.0)?;
            fractal.set_node("Source", &constant)?;
        }
        // 原生侧的引用计数让 Source 保持有效
        assert!((fractal.gen_single_2d(0.0, 0.0, 1337) - 1.0).abs() < EPSILON);
        Ok(())
    }

    #[test]
    fn test_set_float_int_enum() -> Result<()> {
        println!("\n=== Test: Set variables ===\n");

        let library = mock_library();

        let mut constant = library.new_node("Constant")?;
        assert!((constant.gen_single_2d(3.0, 4.0, 0) - 1.0).abs() < EPSILON);
        constant.set_float("Value", -0.75)?;
        assert!((constant.gen_single_3d(3.0, 4.0, 5.0, 0) + 0.75).abs() < EPSILON);

        let mut cellular = library.new_node("Cellular Distance")?;
        cellular.set_enum("Return Type", "Index0 Add 1")?;
        cellular.set_int("Distance Index 0", 2)?;
        let value = cellular.gen_single_4d(0.0, 0.0, 0.0, 0.0, 42);
        println!("Cellular value: {}", value);
        assert!((value - 21.0).abs() < EPSILON);
        Ok(())
    }

    #[test]
    fn test_set_through_member_value() -> Result<()> {
        let library = mock_library();
        let mut cellular = library.new_node("CellularDistance")?;
        let mut constant = library.new_node("Constant")?;
        let mut max_smooth = library.new_node("MaxSmooth")?;

        cellular.set("ReturnType", "Index0 Sub 1")?;
        cellular.set("DistanceIndex0", 1)?;
        cellular.set("JitterModifier", 0.5f32)?;
        let enum_name = String::from("Index0");
        cellular.set("Return Type", &enum_name)?;
        assert!((cellular.gen_single_2d(0.0, 0.0, 0) - 10.0).abs() < EPSILON);

        constant.set("Value", MemberValue::Float(-1.0))?;
        max_smooth.set("LHS", &constant)?;
        max_smooth.set("RHS", 0.25f32)?;
        assert!((max_smooth.gen_single_2d(0.0, 0.0, 0) - 0.25).abs() < EPSILON);
        Ok(())
    }

    #[test]
    fn test_hybrid_accepts_value_or_node() -> Result<()> {
        let library = mock_library();
        let mut lhs = library.new_node("Constant")?;
        let mut rhs = library.new_node("Constant")?;
        let mut max_smooth = library.new_node("Max Smooth")?;
        lhs.set_float("Value", -1.0)?;
        rhs.set_float("Value", 3.0)?;

        max_smooth.set_node("LHS", &lhs)?;
        max_smooth.set_float("RHS", 0.5)?;
        assert!((max_smooth.gen_single_2d(1.0, 1.0, 0) - 0.5).abs() < EPSILON);

        max_smooth.set_node("RHS", &rhs)?;
        assert!((max_smooth.gen_single_2d(1.0, 1.0, 0) - 3.0).abs() < EPSILON);

        // 设回常量会覆盖节点
        max_smooth.set_float("RHS", -0.5)?;
        assert!((max_smooth.gen_single_2d(1.0, 1.0, 0) + 0.5).abs() < EPSILON);
        Ok(())
    }

    #[test]
    fn test_dimension_member_moves_source() -> Result<()> {
        let library = mock_library();
        let simplex = library.new_node("Simplex")?;
        let mut offset = library.new_node("Domain Offset")?;
        offset.set_node("Source", &simplex)?;
        offset.set_float("OffsetX", 1.0)?;
        offset.set_float("Offset Y", 2.0)?;

        let moved = offset.gen_single_2d(0.5, 0.5, 7);
        assert_eq!(moved, simplex.gen_single_2d(1.5, 2.5, 7));
        assert_eq!(moved, simplex_at(1.5, 2.5, 7));
        Ok(())
    }

    #[test]
    fn test_member_errors() -> Result<()> {
        let library = mock_library();
        let mut fractal = library.new_node("Fractal FBm")?;
        let mut cellular = library.new_node("Cellular Distance")?;
        let simplex = library.new_node("Simplex")?;

        assert!(matches!(fractal.set_float("Persistence", 0.5), Err(FastNoiseError::UnknownMember(_))));
        assert!(matches!(
            fractal.set_int("Lacunarity", 2),
            Err(FastNoiseError::TypeMismatch { expected: "an int value", .. })
        ));
        assert!(matches!(fractal.set_float("Octaves", 2.0), Err(FastNoiseError::TypeMismatch { .. })));
        assert!(matches!(fractal.set_node("Lacunarity", &simplex), Err(FastNoiseError::TypeMismatch { .. })));
        assert!(matches!(fractal.set_enum("Octaves", "Index0"), Err(FastNoiseError::TypeMismatch { .. })));
        assert!(matches!(
            cellular.set_enum("Return Type", "Distance2"),
            Err(FastNoiseError::UnknownEnumValue(value)) if value == "Distance2"
        ));

        // 原生 setter 拒绝 NaN
        assert!(matches!(fractal.set_float("Gain", f32::NAN), Err(FastNoiseError::NativeCall(_))));
        assert!(matches!(cellular.set_float("Jitter Modifier", f32::NAN), Err(FastNoiseError::NativeCall(_))));
        Ok(())
    }

    #[test]
    fn test_nodes_from_different_libraries_do_not_mix() -> Result<()> {
        let mut fractal = mock_library().new_node("Fractal FBm")?;
        let simplex = mock_library().new_node("Simplex")?;

        match fractal.set_node("Source", &simplex) {
            Err(e @ FastNoiseError::LibraryMismatch) => assert!(e.is_argument_error()),
            other => panic!("expected LibraryMismatch, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_encoded_node_tree() -> Result<()> {
        let library = mock_library();

        let node = library.node_from_encoded_node_tree("mock:3")?;
        assert_eq!(node.metadata_name(), "cellulardistance");
        assert_eq!(node.metadata().id, 3);

        match library.node_from_encoded_node_tree("DQAFAAAAAAAAQAgAAAAAAD8AAAAAAA==") {
            Err(FastNoiseError::InvalidNodeTree(tree)) => assert!(tree.starts_with("DQAF")),
            other => panic!("expected InvalidNodeTree, got {:?}", other),
        }
        assert!(matches!(
            library.node_from_encoded_node_tree("mock:42"),
            Err(FastNoiseError::InvalidNodeTree(_))
        ));
        assert!(matches!(
            library.node_from_encoded_node_tree("mock:\01"),
            Err(FastNoiseError::InvalidArgument(_))
        ));
        assert!(matches!(
            library.node_from_encoded_node_tree("mock:orphan"),
            Err(FastNoiseError::NativeCall(_))
        ));
        Ok(())
    }

    #[test]
    fn test_uniform_grid_2d_matches_single() -> Result<()> {
        println!("\n=== Test: Uniform grid 2D ===\n");

        let node = mock_library().new_node("Simplex")?;
        let (x_size, y_size, frequency, seed) = (8, 5, 0.02f32, 1337);
        let mut noise = vec![0f32; 40];

        let min_max = node.gen_uniform_grid_2d(&mut noise, -4, 10, x_size, y_size, frequency, seed)?;
        println!("min={} max={}", min_max.min, min_max.max);

        for y in 0..y_size {
            for x in 0..x_size {
                let expected = node.gen_single_2d((x - 4) as f32 * frequency, (y + 10) as f32 * frequency, seed);
                assert_eq!(noise[(y * x_size + x) as usize], expected, "x={} y={}", x, y);
            }
        }
        assert_eq!(min_max, OutputMinMax::from_values(&noise));
        Ok(())
    }

    #[test]
    fn test_uniform_grid_3d_and_4d_layout() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;
        let frequency = 0.5f32;

        let mut noise = vec![0f32; 2 * 3 * 4];
        let min_max = node.gen_uniform_grid_3d(&mut noise, 0, 0, 0, 2, 3, 4, frequency, 3)?;
        // x 变化最快，然后是 y、z
        let idx = 1 + 2 * 2 + 3 * (2 * 3);
        assert_eq!(noise[idx], node.gen_single_3d(0.5, 1.0, 1.5, 3));
        assert_eq!(min_max, OutputMinMax::from_values(&noise));

        let mut noise = vec![0f32; 2 * 2 * 2 * 3];
        node.gen_uniform_grid_4d(&mut noise, 1, 1, 1, 1, 2, 2, 2, 3, frequency, 3)?;
        let idx = 1 + 0 * 2 + 1 * 4 + 2 * 8;
        assert_eq!(noise[idx], node.gen_single_4d(1.0, 0.5, 1.0, 1.5, 3));
        Ok(())
    }

    #[test]
    fn test_tileable_and_position_arrays() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;

        let mut tile = vec![0f32; 16];
        let min_max = node.gen_tileable_2d(&mut tile, 4, 4, 0.1, 9)?;
        assert!(!min_max.is_empty());
        assert!(tile.iter().all(|v| min_max.contains(*v)));

        let xs = [0.0f32, 1.0, 2.5];
        let ys = [3.0f32, -1.0, 0.5];
        let zs = [1.0f32, 1.0, 1.0];
        let ws = [0.0f32, 2.0, 4.0];
        let mut out = vec![0f32; 3];

        node.gen_position_array_2d(&mut out, &xs, &ys, 0.5, -0.5, 11)?;
        for i in 0..3 {
            assert_eq!(out[i], node.gen_single_2d(xs[i] + 0.5, ys[i] - 0.5, 11));
        }

        node.gen_position_array_3d(&mut out, &xs, &ys, &zs, 0.0, 0.0, 1.0, 11)?;
        for i in 0..3 {
            assert_eq!(out[i], node.gen_single_3d(xs[i], ys[i], zs[i] + 1.0, 11));
        }

        let min_max = node.gen_position_array_4d(&mut out, &xs, &ys, &zs, &ws, 0.0, 0.0, 0.0, 0.25, 11)?;
        for i in 0..3 {
            assert_eq!(out[i], node.gen_single_4d(xs[i], ys[i], zs[i], ws[i] + 0.25, 11));
        }
        assert_eq!(min_max, OutputMinMax::from_values(&out));
        Ok(())
    }

    #[test]
    fn test_generator_argument_errors() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;

        let mut small = vec![0f32; 15];
        assert!(matches!(
            node.gen_uniform_grid_2d(&mut small, 0, 0, 4, 4, 0.01, 0),
            Err(FastNoiseError::BufferTooSmall { required: 16, actual: 15 })
        ));
        assert!(matches!(
            node.gen_tileable_2d(&mut small, -4, 4, 0.01, 0),
            Err(FastNoiseError::InvalidArgument(_))
        ));

        let xs = [0.0f32; 4];
        let ys = [0.0f32; 3];
        assert!(matches!(
            node.gen_position_array_2d(&mut small, &xs, &ys, 0.0, 0.0, 0),
            Err(FastNoiseError::InvalidArgument(_))
        ));

        // 空网格不调用原生库
        let mut empty: Vec<f32> = Vec::new();
        let min_max = node.gen_uniform_grid_3d(&mut empty, 0, 0, 0, 0, 16, 16, 0.01, 0)?;
        assert!(min_max.is_empty());
        let min_max = node.gen_position_array_2d(&mut empty, &[], &[], 0.0, 0.0, 0)?;
        assert!(min_max.is_empty());
        Ok(())
    }

    #[test]
    fn test_node_graph() -> Result<()> {
        println!("\n=== Test: Node graph ===\n");

        let library = mock_library();
        let simplex = library.new_node("Simplex")?;

        let mut cellular = library.new_node("CellularDistance")?;
        cellular.set("ReturnType", "Index0Add1")?;
        cellular.set("DistanceIndex0", 2)?;

        let mut add_dim = library.new_node("AddDimension")?;
        add_dim.set("Source", &cellular)?;
        add_dim.set("NewDimensionPosition", 0.5f32)?;

        let mut fractal = library.new_node("FractalFBm")?;
        fractal.set("Source", &simplex)?;
        fractal.set("Gain", 0.3f32)?;
        fractal.set("Lacunarity", 0.6f32)?;

        let mut max_smooth = library.new_node("MaxSmooth")?;
        max_smooth.set("LHS", &fractal)?;
        max_smooth.set("RHS", &add_dim)?;

        let mut noise = vec![0f32; 16 * 16];
        let min_max = max_smooth.gen_uniform_grid_2d(&mut noise, 0, 0, 16, 16, 0.02, 1337)?;
        println!("graph min={} max={}", min_max.min, min_max.max);

        // fractal 的输出在 [-0.3, 0.3]，cellular 分支恒为 21
        assert!(noise.iter().all(|v| (*v - 21.0).abs() < EPSILON));
        assert!((min_max.min - 21.0).abs() < EPSILON);
        Ok(())
    }
}
