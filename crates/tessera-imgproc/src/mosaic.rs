use rayon::prelude::*;
use tessera_image::{geometry, Image, ImageSize};

use crate::{
    core::{check_rgb_convertible, copy_rgb},
    crop::auto_crop,
    error::ImgprocError,
    padding::pad_to_center,
    resize::{resize, ResizeTarget},
};

/// Number of rows and columns of a mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MosaicLayout {
    /// Number of rows of the grid.
    pub rows: usize,
    /// Number of columns of the grid.
    pub columns: usize,
}

impl MosaicLayout {
    /// Create a new layout.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Number of cells of the grid.
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    /// Grid cell (row, col) of the image at `index`.
    ///
    /// Images fill the grid row by row when it has no more rows than columns,
    /// and column by column otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_imgproc::mosaic::MosaicLayout;
    ///
    /// assert_eq!(MosaicLayout::new(2, 3).cell_position(4), (1, 1));
    /// assert_eq!(MosaicLayout::new(3, 2).cell_position(4), (1, 1));
    /// assert_eq!(MosaicLayout::new(3, 2).cell_position(2), (2, 0));
    /// ```
    pub fn cell_position(&self, index: usize) -> (usize, usize) {
        if self.rows <= self.columns {
            (index / self.columns, index % self.columns)
        } else {
            (index % self.rows, index / self.rows)
        }
    }
}

/// Grid dimensions requested for a number of images, as handed over by a
/// command line. Missing dimensions are derived from the image count.
///
/// * Nothing set: a single row holding every image.
/// * `rows` or `columns` alone: the other axis is `ceil(n / given)`.
/// * `max_in_row` (`max_in_column`): that many columns (rows), and as many
///   rows (columns) as needed.
/// * `squarish`: `ceil(sqrt(n))` rows and columns, overriding the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutRequest {
    /// Number of rows.
    pub rows: Option<usize>,
    /// Number of columns.
    pub columns: Option<usize>,
    /// Maximum number of images in a row.
    pub max_in_row: Option<usize>,
    /// Maximum number of images in a column.
    pub max_in_column: Option<usize>,
    /// Use a square grid.
    pub squarish: bool,
}

impl LayoutRequest {
    /// Resolve the request into a grid for `num_images` images.
    ///
    /// # Errors
    ///
    /// * [`ImgprocError::InvalidConfiguration`] if there are no images, a
    ///   dimension is zero, or the request sets both `max_in_row` and
    ///   `max_in_column`, or a cap together with an explicit dimension.
    /// * [`ImgprocError::GridTooSmall`] if explicit rows and columns cannot
    ///   hold every image.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_imgproc::mosaic::{LayoutRequest, MosaicLayout};
    ///
    /// let request = LayoutRequest { max_in_row: Some(3), ..Default::default() };
    /// assert_eq!(request.resolve(7).unwrap(), MosaicLayout::new(3, 3));
    ///
    /// let request = LayoutRequest::default();
    /// assert_eq!(request.resolve(4).unwrap(), MosaicLayout::new(1, 4));
    /// ```
    pub fn resolve(&self, num_images: usize) -> Result<MosaicLayout, ImgprocError> {
        if num_images == 0 {
            return Err(ImgprocError::InvalidConfiguration(
                "cannot lay out zero images".to_string(),
            ));
        }

        let fields = [self.rows, self.columns, self.max_in_row, self.max_in_column];
        if fields.contains(&Some(0)) {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "grid dimensions must be positive: {:?}",
                self
            )));
        }

        if self.squarish {
            if fields.iter().any(Option::is_some) {
                log::warn!("squarish mosaic overrides the requested rows and columns");
            }
            let side = (num_images as f64).sqrt().ceil() as usize;
            return Ok(MosaicLayout::new(side, side));
        }

        let explicit = self.rows.is_some() || self.columns.is_some();
        let layout = match (self.max_in_row, self.max_in_column) {
            (Some(_), Some(_)) => {
                return Err(ImgprocError::InvalidConfiguration(
                    "cannot cap both the rows and the columns".to_string(),
                ))
            }
            (Some(_), None) | (None, Some(_)) if explicit => {
                return Err(ImgprocError::InvalidConfiguration(
                    "a row or column cap excludes explicit rows and columns".to_string(),
                ))
            }
            (Some(max), None) => MosaicLayout::new(num_images.div_ceil(max), max),
            (None, Some(max)) => MosaicLayout::new(max, num_images.div_ceil(max)),
            (None, None) => match (self.rows, self.columns) {
                (None, None) => MosaicLayout::new(1, num_images),
                (Some(rows), None) => MosaicLayout::new(rows, num_images.div_ceil(rows)),
                (None, Some(columns)) => MosaicLayout::new(num_images.div_ceil(columns), columns),
                (Some(rows), Some(columns)) => MosaicLayout::new(rows, columns),
            },
        };

        if layout.capacity() < num_images {
            return Err(ImgprocError::GridTooSmall(
                layout.rows,
                layout.columns,
                num_images,
            ));
        }

        Ok(layout)
    }
}

/// Options of the mosaic composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MosaicConfig {
    /// Crop every image to the bounding box of its foreground.
    pub auto_crop: bool,
    /// Keep a margin around the cropped foreground. Requires `auto_crop`.
    pub auto_border: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            auto_crop: true,
            auto_border: true,
        }
    }
}

/// Mean size over all the images, truncated to whole pixels.
///
/// Returns `None` if `sizes` is empty.
pub fn mean_cell_size(sizes: &[ImageSize]) -> Option<ImageSize> {
    if sizes.is_empty() {
        return None;
    }
    let (sum_width, sum_height) = sizes
        .iter()
        .fold((0, 0), |(w, h), s| (w + s.width, h + s.height));
    Some(ImageSize {
        width: sum_width / sizes.len(),
        height: sum_height / sizes.len(),
    })
}

/// Size of an image of `size` fitted into `cell` while keeping its aspect.
///
/// The axis to anchor is picked by comparing the image ratio (height / width)
/// with the cell ratio, so that neither axis exceeds the cell.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRatio`](tessera_image::ImageError::InvalidRatio)
/// if either size has a zero width.
pub fn fit_size(size: ImageSize, cell: ImageSize) -> Result<ImageSize, ImgprocError> {
    let ratio = geometry::ratio(size.height as f64, size.width as f64)?;
    let cell_ratio = geometry::ratio(cell.height as f64, cell.width as f64)?;

    let (width, height) = if ratio > cell_ratio {
        ((cell.height as f64 / ratio).floor() as usize, cell.height)
    } else {
        (cell.width, (cell.width as f64 * ratio).floor() as usize)
    };

    Ok(ImageSize {
        width: width.clamp(1, cell.width),
        height: height.clamp(1, cell.height),
    })
}

// optional crop of a single image before the layout
fn prepare<const C: usize>(
    image: &Image<u8, C>,
    config: &MosaicConfig,
) -> Result<Image<u8, C>, ImgprocError> {
    if !config.auto_crop {
        return Ok(image.clone());
    }

    let cropped = auto_crop(image, 0)?;
    if !config.auto_border {
        return Ok(cropped);
    }

    let border = (cropped.height() + cropped.width()) / 20;
    auto_crop(image, border)
}

/// Compose several images into a single RGB grid.
///
/// Every image is optionally cropped to its foreground, then resized to fit the
/// mean image size without exceeding it and centered in a cell of that size.
/// See [`MosaicLayout::cell_position`] for the placement order.
///
/// # Arguments
///
/// * `images` - The images to compose. Gray, RGB and RGBA images are accepted.
/// * `layout` - The grid dimensions.
/// * `config` - The crop options.
///
/// # Returns
///
/// An RGB image of size (mean width * columns, mean height * rows). Alpha
/// channels are dropped and empty cells are black.
///
/// # Errors
///
/// * [`ImgprocError::GridTooSmall`] if the grid has fewer cells than images.
/// * [`ImgprocError::InvalidConfiguration`] if `auto_border` is set without
///   `auto_crop`, if there are no images, or if the grid has no cell.
///
/// # Examples
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::mosaic::{compose_mosaic, MosaicConfig, MosaicLayout};
///
/// let images = vec![
///     Image::<u8, 3>::from_size_val(ImageSize { width: 200, height: 100 }, 10).unwrap(),
///     Image::<u8, 3>::from_size_val(ImageSize { width: 100, height: 200 }, 20).unwrap(),
/// ];
///
/// let config = MosaicConfig { auto_crop: false, auto_border: false };
/// let mosaic = compose_mosaic(&images, MosaicLayout::new(1, 2), &config).unwrap();
///
/// assert_eq!(mosaic.size(), ImageSize { width: 300, height: 150 });
/// ```
pub fn compose_mosaic<const C: usize>(
    images: &[Image<u8, C>],
    layout: MosaicLayout,
    config: &MosaicConfig,
) -> Result<Image<u8, 3>, ImgprocError> {
    check_rgb_convertible::<C>()?;

    if config.auto_border && !config.auto_crop {
        return Err(ImgprocError::InvalidConfiguration(
            "auto_border requires auto_crop".to_string(),
        ));
    }
    if images.is_empty() || layout.capacity() == 0 {
        return Err(ImgprocError::InvalidConfiguration(format!(
            "cannot compose {} images in a {}x{} grid",
            images.len(),
            layout.rows,
            layout.columns
        )));
    }
    if layout.capacity() < images.len() {
        return Err(ImgprocError::GridTooSmall(
            layout.rows,
            layout.columns,
            images.len(),
        ));
    }
    if let Some(empty) = images.iter().find(|image| image.size().is_empty()) {
        return Err(tessera_image::ImageError::InvalidImageSize(
            empty.width(),
            empty.height(),
            1,
            1,
        )
        .into());
    }

    let prepared = images
        .par_iter()
        .map(|image| prepare(image, config))
        .collect::<Result<Vec<_>, _>>()?;

    let sizes = prepared.iter().map(|image| image.size()).collect::<Vec<_>>();
    let cell = mean_cell_size(&sizes).ok_or_else(|| {
        ImgprocError::InvalidConfiguration("no image to compose".to_string())
    })?;

    log::debug!(
        "mosaic of {} images in {}x{} cells of {}",
        images.len(),
        layout.rows,
        layout.columns,
        cell
    );

    let tiles = prepared
        .par_iter()
        .map(|image| {
            let fitted = fit_size(image.size(), cell)?;
            let resized = resize(image, ResizeTarget::Dimensions(fitted))?;
            pad_to_center(&resized, cell)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // image index of every grid cell, row-major
    let mut cells = vec![None; layout.capacity()];
    for index in 0..tiles.len() {
        let (row, col) = layout.cell_position(index);
        cells[row * layout.columns + col] = Some(index);
    }

    let mut mosaic = Image::<u8, 3>::from_size_val(
        ImageSize {
            width: cell.width * layout.columns,
            height: cell.height * layout.rows,
        },
        0,
    )?;

    let row_stride = mosaic.width() * 3;
    mosaic
        .as_slice_mut()
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let (grid_row, tile_y) = (y / cell.height, y % cell.height);
            for grid_col in 0..layout.columns {
                let Some(index) = cells[grid_row * layout.columns + grid_col] else {
                    continue;
                };
                let (src_stride, dst_stride) = (cell.width * C, cell.width * 3);
                let src_row = &tiles[index].as_slice()[tile_y * src_stride..][..src_stride];
                let dst_cell = &mut dst_row[grid_col * dst_stride..][..dst_stride];
                src_row
                    .chunks_exact(C)
                    .zip(dst_cell.chunks_exact_mut(3))
                    .for_each(|(pixel, rgb)| copy_rgb(pixel, rgb));
            }
        });

    Ok(mosaic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_position_row_major() {
        let layout = MosaicLayout::new(2, 3);
        let positions = (0..6).map(|i| layout.cell_position(i)).collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_cell_position_column_major() {
        let layout = MosaicLayout::new(3, 2);
        let positions = (0..6).map(|i| layout.cell_position(i)).collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_mean_cell_size() {
        let sizes = [ImageSize::from([200, 100]), ImageSize::from([101, 201])];
        assert_eq!(mean_cell_size(&sizes), Some(ImageSize::from([150, 150])));
        assert_eq!(mean_cell_size(&[]), None);
    }

    #[test]
    fn test_fit_size() -> Result<(), ImgprocError> {
        let cell = ImageSize::from([150, 150]);
        assert_eq!(fit_size([200, 100].into(), cell)?, ImageSize::from([150, 75]));
        assert_eq!(fit_size([100, 200].into(), cell)?, ImageSize::from([75, 150]));
        assert_eq!(fit_size([1000, 1].into(), cell)?, ImageSize::from([150, 1]));
        assert!(matches!(
            fit_size([0, 10].into(), cell),
            Err(ImgprocError::Image(tessera_image::ImageError::InvalidRatio(_, _)))
        ));
        Ok(())
    }

    #[test]
    fn test_layout_request_default_is_single_row() -> Result<(), ImgprocError> {
        assert_eq!(LayoutRequest::default().resolve(5)?, MosaicLayout::new(1, 5));
        Ok(())
    }

    #[test]
    fn test_layout_request_one_axis() -> Result<(), ImgprocError> {
        let rows = LayoutRequest {
            rows: Some(2),
            ..Default::default()
        };
        assert_eq!(rows.resolve(5)?, MosaicLayout::new(2, 3));

        let columns = LayoutRequest {
            columns: Some(4),
            ..Default::default()
        };
        assert_eq!(columns.resolve(5)?, MosaicLayout::new(2, 4));
        assert_eq!(columns.resolve(4)?, MosaicLayout::new(1, 4));
        Ok(())
    }

    #[test]
    fn test_layout_request_both_axes() -> Result<(), ImgprocError> {
        let request = LayoutRequest {
            rows: Some(2),
            columns: Some(2),
            ..Default::default()
        };
        assert_eq!(request.resolve(3)?, MosaicLayout::new(2, 2));
        assert!(matches!(
            request.resolve(5),
            Err(ImgprocError::GridTooSmall(2, 2, 5))
        ));
        Ok(())
    }

    #[test]
    fn test_layout_request_caps() -> Result<(), ImgprocError> {
        let in_row = LayoutRequest {
            max_in_row: Some(3),
            ..Default::default()
        };
        assert_eq!(in_row.resolve(7)?, MosaicLayout::new(3, 3));
        assert_eq!(in_row.resolve(2)?, MosaicLayout::new(1, 3));

        let in_column = LayoutRequest {
            max_in_column: Some(2),
            ..Default::default()
        };
        assert_eq!(in_column.resolve(5)?, MosaicLayout::new(2, 3));
        Ok(())
    }

    #[test]
    fn test_layout_request_squarish() -> Result<(), ImgprocError> {
        let request = LayoutRequest {
            squarish: true,
            ..Default::default()
        };
        assert_eq!(request.resolve(1)?, MosaicLayout::new(1, 1));
        assert_eq!(request.resolve(4)?, MosaicLayout::new(2, 2));
        assert_eq!(request.resolve(5)?, MosaicLayout::new(3, 3));

        let overridden = LayoutRequest {
            rows: Some(1),
            columns: Some(1),
            squarish: true,
            ..Default::default()
        };
        assert_eq!(overridden.resolve(10)?, MosaicLayout::new(4, 4));
        Ok(())
    }

    #[test]
    fn test_layout_request_conflicts() {
        let conflicts = [
            LayoutRequest {
                rows: Some(2),
                max_in_column: Some(2),
                ..Default::default()
            },
            LayoutRequest {
                columns: Some(2),
                max_in_row: Some(2),
                ..Default::default()
            },
            LayoutRequest {
                max_in_row: Some(2),
                max_in_column: Some(2),
                ..Default::default()
            },
            LayoutRequest {
                rows: Some(0),
                ..Default::default()
            },
        ];
        for request in conflicts {
            assert!(matches!(
                request.resolve(4),
                Err(ImgprocError::InvalidConfiguration(_))
            ));
        }
        assert!(matches!(
            LayoutRequest::default().resolve(0),
            Err(ImgprocError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_configuration() -> Result<(), ImgprocError> {
        let images = vec![Image::<u8, 3>::from_size_val([4, 4].into(), 0)?; 3];
        let config = MosaicConfig {
            auto_crop: false,
            auto_border: true,
        };
        assert!(matches!(
            compose_mosaic(&images, MosaicLayout::new(2, 2), &config),
            Err(ImgprocError::InvalidConfiguration(_))
        ));

        let config = MosaicConfig {
            auto_crop: false,
            auto_border: false,
        };
        assert!(matches!(
            compose_mosaic(&images, MosaicLayout::new(1, 2), &config),
            Err(ImgprocError::GridTooSmall(1, 2, 3))
        ));
        assert!(matches!(
            compose_mosaic::<3>(&[], MosaicLayout::new(1, 2), &config),
            Err(ImgprocError::InvalidConfiguration(_))
        ));
        Ok(())
    }

    #[test]
    fn test_alpha_and_gray_are_converted() -> Result<(), ImgprocError> {
        let config = MosaicConfig {
            auto_crop: false,
            auto_border: false,
        };

        let rgba = vec![Image::<u8, 4>::from_size_pixel([2, 2].into(), &[1, 2, 3, 0])?];
        let mosaic = compose_mosaic(&rgba, MosaicLayout::new(1, 1), &config)?;
        assert_eq!(mosaic.num_channels(), 3);
        assert!(mosaic.as_slice().chunks_exact(3).all(|p| p == [1, 2, 3]));

        let gray = vec![Image::<u8, 1>::from_size_val([2, 2].into(), 77)?];
        let mosaic = compose_mosaic(&gray, MosaicLayout::new(1, 1), &config)?;
        assert!(mosaic.as_slice().iter().all(|&v| v == 77));
        Ok(())
    }
}
