/// 网格数据结构模块
///
/// - `FlatMesh`：解析器输出的逐角点扁平序列，每 3 个角点构成一个三角形
/// - `IndexedMesh`：去重后的顶点属性表加 16 位索引序列，可直接上传到GPU

use super::bounds::{compute_bounds, Bounds};
use super::normals::compute_vertex_normals;
use super::tangent::TangentBasis;
use super::vertex::Vertex;
use crate::math::{Vec2, Vec3};

/// 逐角点扁平网格
///
/// 三个序列等长（3 × 三角形数），第 `i` 个元素属于同一个角点。
/// 解析器把共享索引展开成这种布局，以内存换取统一的逐角点访问。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

/// 一个三角形顶点的全部属性
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    /// 切线与副切线（仅在提供了切线空间时存在）
    pub frame: Option<(Vec3, Vec3)>,
}

impl FlatMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配 `corner_capacity` 个角点
    pub fn with_capacity(corner_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(corner_capacity),
            uvs: Vec::with_capacity(corner_capacity),
            normals: Vec::with_capacity(corner_capacity),
        }
    }

    pub fn push_corner(&mut self, position: Vec3, uv: Vec2, normal: Vec3) {
        self.positions.push(position);
        self.uvs.push(uv);
        self.normals.push(normal);
    }

    #[inline]
    pub fn corner_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 检查三个序列等长且长度是3的倍数
    pub fn validate(&self) -> Result<(), String> {
        let len = self.positions.len();
        if self.uvs.len() != len || self.normals.len() != len {
            return Err(format!(
                "属性序列长度不一致: positions={}, uvs={}, normals={}",
                len,
                self.uvs.len(),
                self.normals.len()
            ));
        }
        if len % 3 != 0 {
            return Err(format!("角点数量必须是3的倍数，当前为: {}", len));
        }
        Ok(())
    }

    /// 按顺序遍历角点
    ///
    /// 提供 `basis` 时每个角点都带切线空间；`basis` 比网格短时缺失的部分按零向量处理。
    pub fn corners<'a>(
        &'a self,
        basis: Option<&'a TangentBasis>,
    ) -> impl Iterator<Item = Corner> + 'a {
        self.positions
            .iter()
            .zip(&self.uvs)
            .zip(&self.normals)
            .enumerate()
            .map(move |(i, ((position, uv), normal))| Corner {
                position: *position,
                uv: *uv,
                normal: *normal,
                frame: basis.map(|b| {
                    (
                        b.tangents.get(i).copied().unwrap_or_else(Vec3::zeros),
                        b.bitangents.get(i).copied().unwrap_or_else(Vec3::zeros),
                    )
                }),
            })
    }
}

/// 索引网格
///
/// 每个属性一个连续缓冲区，`indices` 每 3 个元素描述一个三角形。
/// 没有切线空间时 `tangents` / `bitangents` 为空。
///
/// 索引是 16 位的：超过 65 536 个不同顶点时索引会被截断，
/// 调用方需要事先用 `indexer::ensure_index_capacity` 检查。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// 追加一条新顶点记录，返回它的位置
    pub(crate) fn push_corner(&mut self, corner: &Corner) -> usize {
        self.positions.push(corner.position.into());
        self.uvs.push(corner.uv.into());
        self.normals.push(corner.normal.into());
        if let Some((tangent, bitangent)) = corner.frame {
            self.tangents.push(tangent.into());
            self.bitangents.push(bitangent.into());
        }
        self.positions.len() - 1
    }

    /// 把角点的切线空间累加到已有记录上（求和，不归一化）
    pub(crate) fn accumulate_frame(&mut self, index: usize, corner: &Corner) {
        let Some((tangent, bitangent)) = corner.frame else {
            return;
        };
        if let Some(t) = self.tangents.get_mut(index) {
            add_assign(t, tangent);
        }
        if let Some(b) = self.bitangents.get_mut(index) {
            add_assign(b, bitangent);
        }
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 各属性缓冲区长度一致
    /// - 索引数量是3的倍数
    /// - 所有索引都在有效范围内
    pub fn validate(&self) -> Result<(), String> {
        let count = self.vertex_count();
        if self.uvs.len() != count || self.normals.len() != count {
            return Err(format!(
                "属性缓冲区长度不一致: positions={}, uvs={}, normals={}",
                count,
                self.uvs.len(),
                self.normals.len()
            ));
        }
        if self.has_tangents() && (self.tangents.len() != count || self.bitangents.len() != count)
        {
            return Err(format!(
                "切线缓冲区长度不一致: tangents={}, bitangents={}, vertices={}",
                self.tangents.len(),
                self.bitangents.len(),
                count
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        for (i, &index) in self.indices.iter().enumerate() {
            if index as usize >= count {
                return Err(format!(
                    "索引 {} 处的值 {} 超出顶点范围 (顶点数 {})",
                    i, index, count
                ));
            }
        }

        Ok(())
    }

    /// 按索引把位置展开回逐角点序列
    pub fn expand_positions(&self) -> Vec<[f32; 3]> {
        self.indices
            .iter()
            .filter_map(|&i| self.positions.get(i as usize).copied())
            .collect()
    }

    /// 重新归一化累加过的切线和副切线
    ///
    /// 累加和长度为零的向量保持为零，返回这样的向量个数。
    pub fn normalize_tangents(&mut self) -> usize {
        let mut zero_length = 0;
        for v in self.tangents.iter_mut().chain(self.bitangents.iter_mut()) {
            match Vec3::from(*v).try_normalize(f32::EPSILON) {
                Some(unit) => *v = unit.into(),
                None => {
                    *v = [0.0; 3];
                    zero_length += 1;
                }
            }
        }
        zero_length
    }

    /// 用面法线重建平滑顶点法线，覆盖原有法线
    pub fn recompute_normals(&mut self) {
        let indices: Vec<u32> = self.indices.iter().map(|&i| u32::from(i)).collect();
        let normals = compute_vertex_normals(self.position_buffer(), &indices);
        self.normals = bytemuck::cast_slice::<f32, [f32; 3]>(&normals).to_vec();
    }

    /// 去重后顶点位置的包围盒
    pub fn bounds(&self) -> Bounds {
        compute_bounds(self.position_buffer())
    }

    /// 位置缓冲区的扁平视图 (x0, y0, z0, x1, ...)
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn tangent_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tangents)
    }

    pub fn bitangent_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bitangents)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// 生成交错顶点记录
    pub fn to_interleaved(&self) -> Vec<Vertex> {
        (0..self.vertex_count())
            .map(|i| {
                let vertex = Vertex::new(self.positions[i], self.normals[i], self.uvs[i]);
                match (self.tangents.get(i), self.bitangents.get(i)) {
                    (Some(&t), Some(&b)) => vertex.with_tangent_frame(t, b),
                    _ => vertex,
                }
            })
            .collect()
    }
}

#[inline]
fn add_assign(target: &mut [f32; 3], v: Vec3) {
    target[0] += v.x;
    target[1] += v.y;
    target[2] += v.z;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> IndexedMesh {
        IndexedMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            tangents: Vec::new(),
            bitangents: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_flat_mesh_counts() {
        let mut mesh = FlatMesh::with_capacity(3);
        for _ in 0..3 {
            mesh.push_corner(Vec3::zeros(), Vec2::zeros(), Vec3::z());
        }

        assert_eq!(mesh.corner_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_flat_mesh_validation_mismatched_lengths() {
        let mut mesh = FlatMesh::new();
        mesh.push_corner(Vec3::zeros(), Vec2::zeros(), Vec3::z());
        mesh.normals.clear();

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_corners_with_short_basis() {
        let mut mesh = FlatMesh::new();
        mesh.push_corner(Vec3::x(), Vec2::zeros(), Vec3::z());
        mesh.push_corner(Vec3::y(), Vec2::zeros(), Vec3::z());
        let basis = TangentBasis {
            tangents: vec![Vec3::x()],
            bitangents: vec![Vec3::y()],
        };

        let corners: Vec<Corner> = mesh.corners(Some(&basis)).collect();
        assert_eq!(corners.len(), 2);
        assert_eq!(corners[0].frame, Some((Vec3::x(), Vec3::y())));
        assert_eq!(corners[1].frame, Some((Vec3::zeros(), Vec3::zeros())));
        assert!(mesh.corners(None).all(|c| c.frame.is_none()));
    }

    #[test]
    fn test_indexed_mesh_counts_and_validation() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_tangents());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_indexed_mesh_validation_invalid_index_range() {
        let mut mesh = quad();
        mesh.indices[5] = 9;

        let result = mesh.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("超出顶点范围"));
    }

    #[test]
    fn test_expand_positions() {
        let mesh = quad();
        let expanded = mesh.expand_positions();

        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[3], [0.0, 0.0, 0.0]);
        assert_eq!(expanded[5], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_byte_views() {
        let mesh = quad();
        assert_eq!(mesh.position_buffer().len(), 12);
        assert_eq!(mesh.position_bytes().len(), 48);
        assert_eq!(mesh.uv_bytes().len(), 32);
        assert_eq!(mesh.index_bytes().len(), 12);
        assert!(mesh.tangent_bytes().is_empty());
    }

    #[test]
    fn test_normalize_tangents() {
        let mut mesh = quad();
        mesh.tangents = vec![[2.0, 0.0, 0.0]; 4];
        mesh.bitangents = vec![[0.0, 3.0, 4.0]; 4];

        assert_eq!(mesh.normalize_tangents(), 0);

        assert_eq!(mesh.tangents[0], [1.0, 0.0, 0.0]);
        assert!((mesh.bitangents[2][1] - 0.6).abs() < 1e-6);
        assert!((mesh.bitangents[2][2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_tangent_stays_zero() {
        let mut mesh = quad();
        mesh.tangents = vec![[1.0, 0.0, 0.0]; 4];
        mesh.bitangents = vec![[0.0, 1.0, 0.0]; 4];
        // 两个方向相反的切线累加后抵消
        mesh.tangents[1] = [0.0, 0.0, 0.0];

        assert_eq!(mesh.normalize_tangents(), 1);
        assert_eq!(mesh.tangents[1], [0.0, 0.0, 0.0]);
        assert!(mesh.tangents.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn test_recompute_normals() {
        let mut mesh = quad();
        mesh.normals = vec![[0.0, 0.0, 0.0]; 4];

        mesh.recompute_normals();

        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((n[2].abs() - 1.0).abs() < 1e-6, "法线应垂直于 XY 平面: {:?}", n);
        }
    }

    #[test]
    fn test_to_interleaved() {
        let mut mesh = quad();
        let plain = mesh.to_interleaved();
        assert_eq!(plain[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(plain[2].tangent, [0.0, 0.0, 0.0]);

        mesh.tangents = vec![[1.0, 0.0, 0.0]; 4];
        mesh.bitangents = vec![[0.0, 1.0, 0.0]; 4];
        let framed = mesh.to_interleaved();
        assert_eq!(framed[1].texcoord, [1.0, 0.0]);
        assert_eq!(framed[1].bitangent, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_bounds() {
        let bounds = quad().bounds();
        assert_eq!(bounds.x, (0.0, 1.0));
        assert_eq!(bounds.y, (0.0, 1.0));
        assert_eq!(bounds.z, (0.0, 0.0));
    }
}
