//! Banded parallel generation tests

#[cfg(test)]
mod tests {
    use crate::core::error::FastNoiseError;
    use crate::noise::parallel::{DEFAULT_BAND_ROWS, gen_uniform_grid_2d_par, gen_uniform_grid_3d_par};
    use crate::noise::tests::mock_native::mock_library;
    use anyhow::Result;
    use std::time::Instant;

    #[test]
    fn test_banded_2d_equals_single_call() -> Result<()> {
        println!("\n=== Test: Banded 2D grid ===\n");

        let node = mock_library().new_node("Simplex")?;
        let (x_size, y_size) = (37, 29);

        let mut expected = vec![0f32; (x_size * y_size) as usize];
        let expected_bounds = node.gen_uniform_grid_2d(&mut expected, 5, -12, x_size, y_size, 0.03, 1337)?;

        // 29 行按 4 行一段，最后一段只有 1 行
        for band_rows in [1, 4, 29, DEFAULT_BAND_ROWS] {
            let start = Instant::now();
            let (noise, bounds) = gen_uniform_grid_2d_par(&node, 5, -12, x_size, y_size, 0.03, 1337, band_rows)?;
            println!("band_rows={} took {:?}", band_rows, start.elapsed());

            assert_eq!(noise, expected, "band_rows={}", band_rows);
            assert_eq!(bounds, expected_bounds, "band_rows={}", band_rows);
        }
        Ok(())
    }

    #[test]
    fn test_banded_3d_equals_single_call() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;
        let (x_size, y_size, z_size) = (6, 5, 7);

        let mut expected = vec![0f32; (x_size * y_size * z_size) as usize];
        let expected_bounds = node.gen_uniform_grid_3d(&mut expected, 0, 3, -2, x_size, y_size, z_size, 0.1, 99)?;

        for band_slices in [1, 3, 7, 64] {
            let (noise, bounds) =
                gen_uniform_grid_3d_par(&node, 0, 3, -2, x_size, y_size, z_size, 0.1, 99, band_slices)?;
            assert_eq!(noise, expected, "band_slices={}", band_slices);
            assert_eq!(bounds, expected_bounds, "band_slices={}", band_slices);
        }
        Ok(())
    }

    #[test]
    fn test_banded_argument_errors() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;

        assert!(matches!(
            gen_uniform_grid_2d_par(&node, 0, 0, 8, 8, 0.01, 0, 0),
            Err(FastNoiseError::InvalidArgument(_))
        ));
        assert!(matches!(
            gen_uniform_grid_3d_par(&node, 0, 0, 0, 8, 8, 8, 0.01, 0, 0),
            Err(FastNoiseError::InvalidArgument(_))
        ));
        assert!(matches!(
            gen_uniform_grid_2d_par(&node, 0, 0, 8, -1, 0.01, 0, 4),
            Err(FastNoiseError::InvalidArgument(_))
        ));

        let (noise, bounds) = gen_uniform_grid_2d_par(&node, 0, 0, 0, 8, 0.01, 0, 4)?;
        assert!(noise.is_empty());
        assert!(bounds.is_empty());
        Ok(())
    }

    #[test]
    fn test_oversized_band_is_one_band() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;

        let mut expected = vec![0f32; 16];
        let expected_bounds = node.gen_uniform_grid_2d(&mut expected, 0, 0, 4, 4, 0.1, 1)?;
        let (noise, bounds) = gen_uniform_grid_2d_par(&node, 0, 0, 4, 4, 0.1, 1, usize::MAX)?;
        assert_eq!(noise, expected);
        assert_eq!(bounds, expected_bounds);

        let mut expected = vec![0f32; 2 * 2 * 3];
        let expected_bounds = node.gen_uniform_grid_3d(&mut expected, 0, 0, 0, 2, 2, 3, 0.1, 1)?;
        let (noise, bounds) = gen_uniform_grid_3d_par(&node, 0, 0, 0, 2, 2, 3, 0.1, 1, usize::MAX)?;
        assert_eq!(noise, expected);
        assert_eq!(bounds, expected_bounds);
        Ok(())
    }

    #[test]
    fn test_band_start_near_i32_max() -> Result<()> {
        let node = mock_library().new_node("Simplex")?;

        // 最后一行正好是 i32::MAX
        let (noise, _) = gen_uniform_grid_2d_par(&node, 0, i32::MAX - 3, 2, 4, 0.0, 1, 1)?;
        assert_eq!(noise.len(), 8);

        assert!(matches!(
            gen_uniform_grid_2d_par(&node, 0, i32::MAX - 2, 2, 4, 0.0, 1, 1),
            Err(FastNoiseError::InvalidArgument(_))
        ));
        assert!(matches!(
            gen_uniform_grid_3d_par(&node, 0, 0, i32::MAX, 2, 2, 2, 0.0, 1, 1),
            Err(FastNoiseError::InvalidArgument(_))
        ));
        Ok(())
    }
}
