/// OBJ 文件解析器
///
/// 手写的逐行解析器，只接受下面的语法（空白分隔，行首为标签）：
///
/// - `v x y z`：位置
/// - `vt u v`：纹理坐标，`flip_v` 开启时 v 取反
/// - `vn x y z`：法线
/// - `f a/b/c a/b/c a/b/c`：恰好三个角点，每个角点恰好三个从 1 开始的索引
/// - 其他标签（包括 `#` 注释）：整行忽略
///
/// 行内 `#` 之后的内容视为注释。
///
/// 所有行读完后再把角点的三个索引解析成具体的值，
/// 输出每个角点独立一份属性的扁平网格。
use super::MeshLoader;
use crate::core::error::{AttributeKind, DistMeshError, MeshLoadError, Result};
use crate::geometry::mesh::FlatMesh;
use crate::math::{Vec2, Vec3};
use std::path::Path;
use std::str::SplitWhitespace;

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// 对 `vt` 的 v 分量取反。
    ///
    /// 目标采样器的 UV 原点在左上角（如 DDS 纹理）时开启；
    /// 加载未翻转的格式时关闭。
    pub flip_v: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { flip_v: true }
    }
}

/// OBJ 格式加载器
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_mesh::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let mesh = ObjLoader::default().load_from_file(Path::new("model.obj"))?;
/// println!("加载了 {} 个三角形", mesh.triangle_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader {
    options: ParseOptions,
}

/// 一个角点在三个属性池中的索引（1 开始，尚未校验）
#[derive(Debug, Clone, Copy)]
struct CornerRef {
    line: usize,
    position: i64,
    uv: i64,
    normal: i64,
}

impl ObjLoader {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// 解析 OBJ 源文本
    pub fn parse_str(&self, source: &str) -> Result<FlatMesh> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut uvs: Vec<Vec2> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut corners: Vec<CornerRef> = Vec::new();

        for (i, text) in source.lines().enumerate() {
            let line = i + 1;
            let content = text.split_once('#').map_or(text, |(head, _)| head);
            let mut tokens = content.split_whitespace();
            let Some(tag) = tokens.next() else {
                continue;
            };

            match tag {
                "v" => {
                    let [x, y, z] = parse_floats::<3>(&mut tokens, line, tag)?;
                    positions.push(Vec3::new(x, y, z));
                }
                "vt" => {
                    let [u, v] = parse_floats::<2>(&mut tokens, line, tag)?;
                    let v = if self.options.flip_v { -v } else { v };
                    uvs.push(Vec2::new(u, v));
                }
                "vn" => {
                    let [x, y, z] = parse_floats::<3>(&mut tokens, line, tag)?;
                    normals.push(Vec3::new(x, y, z));
                }
                "f" => corners.extend(parse_face(tokens, line, text)?),
                // 注释或不支持的标签，忽略整行
                _ => {}
            }
        }

        tracing::info!(
            positions = positions.len(),
            uvs = uvs.len(),
            normals = normals.len(),
            faces = corners.len() / 3,
            "OBJ 属性池"
        );

        let mut mesh = FlatMesh::with_capacity(corners.len());
        for corner in &corners {
            mesh.push_corner(
                resolve(&positions, corner.position, AttributeKind::Position, corner.line)?,
                resolve(&uvs, corner.uv, AttributeKind::TexCoord, corner.line)?,
                resolve(&normals, corner.normal, AttributeKind::Normal, corner.line)?,
            );
        }

        Ok(mesh)
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(&self, path: &Path) -> Result<FlatMesh> {
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DistMeshError::from(MeshLoadError::FileNotFound(path.to_path_buf()))
            }
            _ => DistMeshError::Io(e),
        })?;

        tracing::info!(path = %path.display(), "正在加载 OBJ 文件");

        let mesh = self.parse_str(&source)?;

        tracing::info!(
            "成功加载 OBJ 文件: {} 个三角形, {} 个角点",
            mesh.triangle_count(),
            mesh.corner_count()
        );

        Ok(mesh)
    }

    fn load_from_memory(&self, data: &[u8]) -> Result<FlatMesh> {
        let source = std::str::from_utf8(data)
            .map_err(|e| MeshLoadError::ParseError(format!("OBJ 数据不是有效的 UTF-8: {}", e)))?;
        self.parse_str(source)
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }
}

/// 读取恰好 `N` 个浮点分量，多余的分量忽略
fn parse_floats<const N: usize>(
    tokens: &mut SplitWhitespace<'_>,
    line: usize,
    tag: &str,
) -> Result<[f32; N]> {
    let mut values = [0.0f32; N];
    for value in values.iter_mut() {
        *value = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| MeshLoadError::MalformedAttribute {
                line,
                tag: tag.to_string(),
            })?;
    }
    Ok(values)
}

/// 解析 `f` 行的三个角点，必须恰好是 9 个整数
fn parse_face(tokens: SplitWhitespace<'_>, line: usize, text: &str) -> Result<[CornerRef; 3]> {
    let malformed = || MeshLoadError::MalformedFace {
        line,
        content: text.trim().to_string(),
    };

    let parts: Vec<&str> = tokens.collect();
    if parts.len() != 3 {
        return Err(malformed().into());
    }

    let mut corners = [CornerRef {
        line,
        position: 0,
        uv: 0,
        normal: 0,
    }; 3];

    for (corner, part) in corners.iter_mut().zip(&parts) {
        let indices: Vec<i64> = part
            .split('/')
            .map(|s| s.parse::<i64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| malformed())?;

        let &[position, uv, normal] = indices.as_slice() else {
            return Err(malformed().into());
        };

        corner.position = position;
        corner.uv = uv;
        corner.normal = normal;
    }

    Ok(corners)
}

/// 把从 1 开始的索引解析成属性值
fn resolve<T: Copy>(pool: &[T], index: i64, attribute: AttributeKind, line: usize) -> Result<T> {
    index
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| pool.get(i))
        .copied()
        .ok_or_else(|| {
            MeshLoadError::IndexOutOfRange {
                line,
                attribute,
                index,
                len: pool.len(),
            }
            .into()
        })
}
