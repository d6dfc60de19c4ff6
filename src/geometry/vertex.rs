/// 交错顶点布局
///
/// 索引网格默认按属性分开存放（每个属性一个连续缓冲区），
/// 需要单一交错顶点缓冲区的后端使用 `IndexedMesh::to_interleaved` 生成这里的记录。

use bytemuck::{Pod, Zeroable};

/// 交错顶点记录
///
/// `#[repr(C)]`，字段按声明顺序紧密排列，步长 56 字节：
///
/// | 字段 | 偏移 | 类型 |
/// |------|------|------|
/// | position | 0 | `[f32; 3]` |
/// | normal | 12 | `[f32; 3]` |
/// | texcoord | 24 | `[f32; 2]` |
/// | tangent | 32 | `[f32; 3]` |
/// | bitangent | 44 | `[f32; 3]` |
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],

    pub normal: [f32; 3],

    /// 已按加载选项处理过 v 翻转
    pub texcoord: [f32; 2],

    /// 切线向量，未计算切线空间时为零
    pub tangent: [f32; 3],

    /// 副切线向量，未计算切线空间时为零
    pub bitangent: [f32; 3],
}

impl Vertex {
    #[inline]
    pub fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            texcoord,
            ..Self::default()
        }
    }

    /// 附加切线空间
    #[inline]
    pub fn with_tangent_frame(mut self, tangent: [f32; 3], bitangent: [f32; 3]) -> Self {
        self.tangent = tangent;
        self.bitangent = bitangent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_vertex_size() {
        assert_eq!(size_of::<Vertex>(), 56);
        assert_eq!(std::mem::offset_of!(Vertex, texcoord), 24);
        assert_eq!(std::mem::offset_of!(Vertex, bitangent), 44);
    }

    #[test]
    fn test_vertex_creation() {
        let vertex = Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5])
            .with_tangent_frame([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);

        assert_eq!(vertex.position, [1.0, 2.0, 3.0]);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertex.texcoord, [0.5, 0.5]);
        assert_eq!(vertex.tangent, [1.0, 0.0, 0.0]);
        assert_eq!(vertex.bitangent, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_bytes() {
        let vertices = [Vertex::default(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 112);
    }
}
